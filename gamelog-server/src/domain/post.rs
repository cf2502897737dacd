use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::CategoryRef;
use super::error::DomainError;
use super::image_host::ImageHostPolicy;
use super::play_log::PlayLog;

pub(crate) const MAX_TITLE_LEN: usize = 255;
pub(crate) const MAX_RATING: i64 = 5;

/// Where a game sits in the backlog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum GameStatus {
    #[default]
    Unplayed,
    Playing,
    Completed,
    Perfect,
}

impl GameStatus {
    pub(crate) const ALL: [GameStatus; 4] = [
        GameStatus::Unplayed,
        GameStatus::Playing,
        GameStatus::Completed,
        GameStatus::Perfect,
    ];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            GameStatus::Unplayed => "UNPLAYED",
            GameStatus::Playing => "PLAYING",
            GameStatus::Completed => "COMPLETED",
            GameStatus::Perfect => "PERFECT",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        GameStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| {
                DomainError::validation(
                    "status",
                    "must be one of UNPLAYED, PLAYING, COMPLETED, PERFECT",
                )
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) cover_image_url: Option<String>,
    pub(crate) status: GameStatus,
    pub(crate) play_time: i32,
    pub(crate) rating: i16,
    pub(crate) categories: Vec<CategoryRef>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Post {
    /// Checks invariants on a post loaded from storage.
    pub(crate) fn validated(self) -> Result<Self, DomainError> {
        if self.id <= 0 {
            return Err(DomainError::validation("id", "must be > 0"));
        }
        normalize_title(&self.title)?;
        validate_play_time(i64::from(self.play_time))?;
        validate_rating(i64::from(self.rating))?;
        if self.updated_at < self.created_at {
            return Err(DomainError::validation(
                "updated_at",
                "must be >= created_at",
            ));
        }
        Ok(self)
    }

    pub(crate) fn has_category(&self, category_id: i64) -> bool {
        self.categories.iter().any(|category| category.id == category_id)
    }
}

/// Post together with its diary, newest entry first.
#[derive(Debug, Clone)]
pub(crate) struct PostDetail {
    pub(crate) post: Post,
    pub(crate) play_logs: Vec<PlayLog>,
}

/// Body of both create and full-replace update.
#[derive(Debug, Clone)]
pub(crate) struct PostRequest {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) cover_image_url: Option<String>,
    pub(crate) status: GameStatus,
    pub(crate) play_time: i64,
    pub(crate) rating: i64,
    pub(crate) category_ids: Vec<i64>,
}

/// A write request that passed validation; numeric fields are narrowed to
/// their storage types.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidPost {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) cover_image_url: Option<String>,
    pub(crate) status: GameStatus,
    pub(crate) play_time: i32,
    pub(crate) rating: i16,
    pub(crate) category_ids: Vec<i64>,
}

impl PostRequest {
    pub(crate) fn validate(self, images: &ImageHostPolicy) -> Result<ValidPost, DomainError> {
        let title = normalize_title(&self.title)?;
        let play_time = validate_play_time(self.play_time)?;
        let rating = validate_rating(self.rating)?;

        let cover_image_url = match self.cover_image_url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(url) => Some(images.check_url(url)?),
        };

        let mut category_ids = Vec::with_capacity(self.category_ids.len());
        for id in self.category_ids {
            if id <= 0 {
                return Err(DomainError::validation("category_ids", "ids must be > 0"));
            }
            if !category_ids.contains(&id) {
                category_ids.push(id);
            }
        }

        Ok(ValidPost {
            title,
            content: self.content.trim().to_string(),
            cover_image_url,
            status: self.status,
            play_time,
            rating,
            category_ids,
        })
    }
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::validation("title", "must be 1..255 chars"));
    }
    Ok(title.to_string())
}

fn validate_play_time(minutes: i64) -> Result<i32, DomainError> {
    if minutes < 0 {
        return Err(DomainError::validation("play_time", "must be >= 0"));
    }
    i32::try_from(minutes).map_err(|_| DomainError::validation("play_time", "is too large"))
}

fn validate_rating(rating: i64) -> Result<i16, DomainError> {
    if !(0..=MAX_RATING).contains(&rating) {
        return Err(DomainError::validation("rating", "must be 0..5"));
    }
    // 0..=5 always fits
    Ok(rating as i16)
}
