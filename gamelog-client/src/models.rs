use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Backlog state of a game.
pub enum GameStatus {
    /// Owned but not started.
    #[default]
    Unplayed,
    /// In progress.
    Playing,
    /// Finished.
    Completed,
    /// Finished with everything unlocked.
    Perfect,
}

impl GameStatus {
    /// Wire name, e.g. `PLAYING`.
    pub fn as_str(self) -> &'static str {
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
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        [
            GameStatus::Unplayed,
            GameStatus::Playing,
            GameStatus::Completed,
            GameStatus::Perfect,
        ]
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(raw.trim()))
        .ok_or_else(|| {
            format!("unknown status '{raw}', expected UNPLAYED, PLAYING, COMPLETED or PERFECT")
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Registered user.
pub struct User {
    /// User id.
    pub id: i64,
    /// Normalized (lowercase) email.
    pub email: String,
    /// Registration time (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Answer to a successful register or login.
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// The authenticated user.
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Category attached to a post.
pub struct CategoryRef {
    /// Category id.
    pub id: i64,
    /// Category name.
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Game entry.
pub struct Post {
    /// Post id.
    pub id: i64,
    /// Game title.
    pub title: String,
    /// Free-form notes.
    pub content: String,
    /// Cover art URL.
    pub cover_image_url: Option<String>,
    /// Backlog state.
    pub status: GameStatus,
    /// Minutes played.
    pub play_time: i32,
    /// Rating from 0 to 5.
    pub rating: i16,
    /// Attached categories, ordered by name.
    pub categories: Vec<CategoryRef>,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
    /// Last update time (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Diary entry about a play session.
pub struct PlayLog {
    /// Entry id.
    pub id: i64,
    /// Post the entry belongs to.
    pub post_id: i64,
    /// Entry text.
    pub content: String,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
    /// Last update time (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Post together with its play logs, newest first.
pub struct PostDetail {
    /// The post itself.
    #[serde(flatten)]
    pub post: Post,
    /// Diary entries.
    pub play_logs: Vec<PlayLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Filtered post list.
pub struct ListPostsResponse {
    /// Matching posts, newest first.
    pub posts: Vec<Post>,
    /// Number of matching posts.
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Category as returned by create and rename.
pub struct Category {
    /// Category id.
    pub id: i64,
    /// Category name.
    pub name: String,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
    /// Last update time (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Category with the number of posts linked to it.
pub struct CategorySummary {
    /// Category id.
    pub id: i64,
    /// Category name.
    pub name: String,
    /// Linked posts.
    pub post_count: i64,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
    /// Last update time (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Library statistics.
pub struct Stats {
    /// All posts.
    pub total: u64,
    /// Posts in UNPLAYED.
    pub unplayed: u64,
    /// Posts in PLAYING.
    pub playing: u64,
    /// Posts in COMPLETED.
    pub completed: u64,
    /// Posts in PERFECT.
    pub perfect: u64,
    /// Sum of play time in minutes.
    pub total_play_minutes: u64,
    /// Sum of play time in whole hours.
    pub total_play_hours: u64,
    /// Percent of COMPLETED and PERFECT posts.
    pub clear_rate: u64,
    /// Set when the backlog of unplayed games has grown large.
    pub backlog_warning: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Body of post create and update. Update replaces every field.
pub struct PostInput {
    /// Game title.
    pub title: String,
    /// Free-form notes.
    pub content: String,
    /// Cover art URL; `None` clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    /// Backlog state.
    pub status: GameStatus,
    /// Minutes played.
    pub play_time: i64,
    /// Rating from 0 to 5.
    pub rating: i64,
    /// Categories to attach.
    pub category_ids: Vec<i64>,
}

impl From<&Post> for PostInput {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            cover_image_url: post.cover_image_url.clone(),
            status: post.status,
            play_time: i64::from(post.play_time),
            rating: i64::from(post.rating),
            category_ids: post.categories.iter().map(|category| category.id).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
/// Filters for the post list; unset fields are not sent.
pub struct ListPostsQuery {
    /// Only posts in this state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GameStatus>,
    /// Case-insensitive text in title or notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Only posts linked to this category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    /// First creation day, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Last creation day, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}
