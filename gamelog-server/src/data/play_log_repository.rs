use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::play_log::PlayLog;

#[derive(Debug, Clone)]
pub(crate) struct NewPlayLog {
    pub(crate) post_id: i64,
    pub(crate) content: String,
}

#[async_trait]
pub(crate) trait PlayLogRepository: Send + Sync {
    /// Fails with `NotFound` when the post does not exist.
    async fn create_play_log(&self, input: NewPlayLog) -> Result<PlayLog, DomainError>;
    /// Entries of one post, newest first.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<PlayLog>, DomainError>;
}
