use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::error;

use crate::data::category_repository::CategoryRepository;
use crate::domain::category::{Category, CategoryWithCount};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CategoryCountRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    post_count: i64,
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create_category(&self, name: &str) -> Result<Category, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_category_db_error)?;

        map_row_to_category(row)
    }

    async fn rename_category(&self, id: i64, name: &str) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET name = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_category_db_error)?;

        row.map(map_row_to_category).transpose()
    }

    async fn delete_category(&self, id: i64) -> Result<Option<Category>, DomainError> {
        // post_categories rows go with the category (ON DELETE CASCADE)
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            DELETE FROM categories
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_category_db_error)?;

        row.map(map_row_to_category).transpose()
    }

    async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, DomainError> {
        let rows = sqlx::query_as::<_, CategoryCountRow>(
            r#"
            SELECT
                c.id,
                c.name,
                c.created_at,
                c.updated_at,
                COUNT(pc.post_id) AS post_count
            FROM categories c
            LEFT JOIN post_categories pc ON pc.category_id = c.id
            GROUP BY c.id
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_category_db_error)?;

        rows.into_iter()
            .map(|row| {
                let category = Category::new(row.id, row.name, row.created_at, row.updated_at)
                    .map_err(|err| DomainError::Unexpected(err.to_string()))?;
                Ok(CategoryWithCount {
                    category,
                    post_count: row.post_count,
                })
            })
            .collect()
    }
}

fn map_row_to_category(row: CategoryRow) -> Result<Category, DomainError> {
    Category::new(row.id, row.name, row.created_at, row.updated_at)
        .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_category_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23505")
    {
        return DomainError::AlreadyExists("category name".to_string());
    }
    error!(error = %err, "category query failed");
    DomainError::Unexpected(err.to_string())
}
