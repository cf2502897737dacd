use chrono::NaiveDate;

use super::error::DomainError;
use super::post::{GameStatus, Post};

/// Conditions for narrowing the post list. Every condition that is set must
/// hold for a post to be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PostFilter {
    pub(crate) status: Option<GameStatus>,
    /// Lowercased needle matched against title and notes.
    pub(crate) text: Option<String>,
    pub(crate) category_id: Option<i64>,
    /// Inclusive, compared against the UTC calendar day of `created_at`.
    pub(crate) created_from: Option<NaiveDate>,
    pub(crate) created_to: Option<NaiveDate>,
}

impl PostFilter {
    pub(crate) fn new(
        status: Option<GameStatus>,
        text: Option<&str>,
        category_id: Option<i64>,
        created_from: Option<NaiveDate>,
        created_to: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        if let (Some(from), Some(to)) = (created_from, created_to)
            && from > to
        {
            return Err(DomainError::validation("from", "must not be after 'to'"));
        }

        let text = text
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase);

        Ok(Self {
            status,
            text,
            category_id,
            created_from,
            created_to,
        })
    }

    pub(crate) fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn matches(&self, post: &Post) -> bool {
        self.matches_status(post)
            && self.matches_text(post)
            && self.matches_category(post)
            && self.matches_dates(post)
    }

    pub(crate) fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        if self.is_empty() {
            return posts;
        }
        posts.into_iter().filter(|post| self.matches(post)).collect()
    }

    fn matches_status(&self, post: &Post) -> bool {
        self.status.is_none_or(|status| post.status == status)
    }

    fn matches_text(&self, post: &Post) -> bool {
        self.text.as_deref().is_none_or(|needle| {
            post.title.to_lowercase().contains(needle)
                || post.content.to_lowercase().contains(needle)
        })
    }

    fn matches_category(&self, post: &Post) -> bool {
        self.category_id
            .is_none_or(|category_id| post.has_category(category_id))
    }

    fn matches_dates(&self, post: &Post) -> bool {
        let day = post.created_at.date_naive();
        self.created_from.is_none_or(|from| day >= from)
            && self.created_to.is_none_or(|to| day <= to)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::PostFilter;
    use crate::domain::category::CategoryRef;
    use crate::domain::post::{GameStatus, Post};

    fn post(id: i64, title: &str, content: &str, status: GameStatus, day: u32) -> Post {
        let created_at = Utc
            .with_ymd_and_hms(2026, 3, day, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        Post {
            id,
            title: title.to_string(),
            content: content.to_string(),
            cover_image_url: None,
            status,
            play_time: 0,
            rating: 0,
            categories: vec![CategoryRef {
                id: id % 2 + 1,
                name: format!("cat {}", id % 2 + 1),
            }],
            created_at,
            updated_at: created_at,
        }
    }

    fn fixture() -> Vec<Post> {
        vec![
            post(1, "Elden Ring", "boss fights", GameStatus::Playing, 1),
            post(2, "Hollow Knight", "bought on sale", GameStatus::Unplayed, 2),
            post(3, "Hades", "roguelike masterpiece", GameStatus::Perfect, 3),
            post(4, "VALORANT", "ranked grind", GameStatus::Playing, 4),
            post(5, "Ghost of Tsushima", "open world", GameStatus::Completed, 5),
        ]
    }

    fn ids(posts: &[Post]) -> Vec<i64> {
        posts.iter().map(|post| post.id).collect()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).expect("valid date")
    }

    #[test]
    fn status_filter_returns_exactly_matching_posts() {
        let filter = PostFilter::new(Some(GameStatus::Playing), None, None, None, None)
            .expect("valid filter");
        assert_eq!(ids(&filter.apply(fixture())), vec![1, 4]);
    }

    #[test]
    fn text_search_is_case_insensitive_over_title_and_content() {
        let by_title = PostFilter::new(None, Some("  hOLLow "), None, None, None)
            .expect("valid filter");
        assert_eq!(ids(&by_title.apply(fixture())), vec![2]);

        let by_content = PostFilter::new(None, Some("ROGUELIKE"), None, None, None)
            .expect("valid filter");
        assert_eq!(ids(&by_content.apply(fixture())), vec![3]);
    }

    #[test]
    fn category_filter_checks_associations() {
        let filter = PostFilter::new(None, None, Some(1), None, None).expect("valid filter");
        assert_eq!(ids(&filter.apply(fixture())), vec![2, 4]);
    }

    #[test]
    fn date_range_is_inclusive_by_day() {
        let filter = PostFilter::new(None, None, None, Some(date(2)), Some(date(4)))
            .expect("valid filter");
        assert_eq!(ids(&filter.apply(fixture())), vec![2, 3, 4]);

        let open_start = PostFilter::new(None, None, None, None, Some(date(1)))
            .expect("valid filter");
        assert_eq!(ids(&open_start.apply(fixture())), vec![1]);
    }

    #[test]
    fn predicates_are_combined_with_and() {
        let filter = PostFilter::new(
            Some(GameStatus::Playing),
            Some("r"),
            Some(1),
            Some(date(2)),
            None,
        )
        .expect("valid filter");
        assert_eq!(ids(&filter.apply(fixture())), vec![4]);
    }

    #[test]
    fn blank_text_is_ignored() {
        let filter = PostFilter::new(None, Some("   "), None, None, None).expect("valid filter");
        assert!(filter.is_empty());
        assert_eq!(filter.apply(fixture()).len(), 5);
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(PostFilter::new(None, None, None, Some(date(5)), Some(date(1))).is_err());
    }
}
