use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

pub(crate) const MAX_PLAY_LOG_LEN: usize = 10_000;

/// One diary entry about a play session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PlayLog {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct CreatePlayLogRequest {
    pub(crate) post_id: i64,
    pub(crate) content: String,
}

impl CreatePlayLogRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if self.post_id <= 0 {
            return Err(DomainError::validation("post_id", "must be > 0"));
        }
        let content = self.content.trim();
        if content.is_empty() {
            return Err(DomainError::validation("content", "must not be empty"));
        }
        if content.chars().count() > MAX_PLAY_LOG_LEN {
            return Err(DomainError::validation(
                "content",
                "must be at most 10000 chars",
            ));
        }
        Ok(Self {
            post_id: self.post_id,
            content: content.to_string(),
        })
    }
}
