use std::sync::Arc;

use tracing::info;

use crate::data::category_repository::CategoryRepository;
use crate::domain::category::{Category, CategoryRequest, CategoryWithCount};
use crate::domain::error::DomainError;

pub(crate) struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub(crate) fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_category(
        &self,
        req: CategoryRequest,
    ) -> Result<Category, DomainError> {
        let req = req.validate()?;
        let category = self.repo.create_category(&req.name).await?;
        info!(category_id = category.id, "category created");
        Ok(category)
    }

    pub(crate) async fn rename_category(
        &self,
        id: i64,
        req: CategoryRequest,
    ) -> Result<Category, DomainError> {
        let req = req.validate()?;
        let category = self
            .repo
            .rename_category(id, &req.name)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("category id: {id}")))?;
        info!(category_id = category.id, "category renamed");
        Ok(category)
    }

    /// Posts linked to the category survive; only the links go.
    pub(crate) async fn delete_category(&self, id: i64) -> Result<Category, DomainError> {
        let category = self
            .repo
            .delete_category(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("category id: {id}")))?;
        info!(category_id = category.id, "category deleted");
        Ok(category)
    }

    pub(crate) async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, DomainError> {
        self.repo.list_categories().await
    }
}
