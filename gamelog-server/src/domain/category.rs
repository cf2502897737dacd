use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

pub(crate) const MAX_CATEGORY_NAME_LEN: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Category {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

/// Lightweight view of a category attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CategoryRef {
    pub(crate) id: i64,
    pub(crate) name: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CategoryWithCount {
    pub(crate) category: Category,
    pub(crate) post_count: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct CategoryRequest {
    pub(crate) name: String,
}

impl CategoryRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            name: normalize_category_name(&self.name)?,
        })
    }
}

impl Category {
    pub(crate) fn new(
        id: i64,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::validation("id", "must be > 0"));
        }
        let name = normalize_category_name(&name.into())?;

        Ok(Self {
            id,
            name,
            created_at,
            updated_at,
        })
    }
}

fn normalize_category_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(DomainError::validation("name", "must be 1..64 chars"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{Category, CategoryRequest};

    #[test]
    fn request_trims_name() {
        let req = CategoryRequest {
            name: "  Switch ".to_string(),
        };
        assert_eq!(req.validate().expect("must be valid").name, "Switch");
    }

    #[test]
    fn request_rejects_blank_and_long_names() {
        let blank = CategoryRequest {
            name: "   ".to_string(),
        };
        assert!(blank.validate().is_err());

        let long = CategoryRequest {
            name: "x".repeat(65),
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn multibyte_names_are_measured_in_chars() {
        let req = CategoryRequest {
            name: "アクション".repeat(12),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn new_rejects_non_positive_id() {
        let now = Utc::now();
        assert!(Category::new(0, "RPG", now, now).is_err());
    }
}
