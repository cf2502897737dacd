use async_trait::async_trait;

use crate::domain::category::{Category, CategoryWithCount};
use crate::domain::error::DomainError;

#[async_trait]
pub(crate) trait CategoryRepository: Send + Sync {
    async fn create_category(&self, name: &str) -> Result<Category, DomainError>;
    async fn rename_category(&self, id: i64, name: &str) -> Result<Option<Category>, DomainError>;
    /// Removes the category and its post links; posts stay.
    async fn delete_category(&self, id: i64) -> Result<Option<Category>, DomainError>;
    /// All categories with the number of linked posts, newest first.
    async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, DomainError>;
}
