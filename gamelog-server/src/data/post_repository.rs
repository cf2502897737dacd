use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::{Post, ValidPost};

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    /// Inserts the post and its category links in one transaction.
    async fn create_post(&self, input: ValidPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    /// Replaces all fields and the whole category set.
    async fn update_post(&self, id: i64, input: ValidPost) -> Result<Option<Post>, DomainError>;
    /// Removes the post with its play logs and category links and returns what
    /// was deleted.
    async fn delete_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>, DomainError>;
}
