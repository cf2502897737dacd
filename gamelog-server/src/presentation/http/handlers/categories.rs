use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use super::MessageDto;
use crate::domain::category::{Category, CategoryRequest, CategoryWithCount};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::{ApiJson, ApiPath};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CategoryWriteDto {
    #[validate(length(min = 1))]
    pub(crate) name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryDto {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryWithCountDto {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) post_count: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<CategoryWithCount> for CategoryWithCountDto {
    fn from(entry: CategoryWithCount) -> Self {
        Self {
            id: entry.category.id,
            name: entry.category.name,
            post_count: entry.post_count,
            created_at: entry.category.created_at,
            updated_at: entry.category.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Categories with post counts", body = [CategoryWithCountDto]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<CategoryWithCountDto>>)> {
    let categories = state.category_service.list_categories().await?;

    Ok((
        StatusCode::OK,
        Json(
            categories
                .into_iter()
                .map(CategoryWithCountDto::from)
                .collect(),
        ),
    ))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    tag = "categories",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CategoryWriteDto,
    responses(
        (status = 201, description = "Category created", body = CategoryDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Name already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_category(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    ApiJson(dto): ApiJson<CategoryWriteDto>,
) -> AppResult<(StatusCode, Json<CategoryDto>)> {
    dto.validate()?;
    let category = state
        .category_service
        .create_category(CategoryRequest { name: dto.name })
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryDto::from(category))))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    tag = "categories",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Category id")
    ),
    request_body = CategoryWriteDto,
    responses(
        (status = 200, description = "Category renamed", body = CategoryDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Name already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn rename_category(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(dto): ApiJson<CategoryWriteDto>,
) -> AppResult<(StatusCode, Json<CategoryDto>)> {
    dto.validate()?;
    let category = state
        .category_service
        .rename_category(id, CategoryRequest { name: dto.name })
        .await?;

    Ok((StatusCode::OK, Json(CategoryDto::from(category))))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    tag = "categories",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category deleted; linked posts are kept", body = MessageDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_category(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<(StatusCode, Json<MessageDto>)> {
    info!(
        user_id = auth.user_id,
        email = %auth.email,
        category_id = id,
        "category delete requested"
    );
    let category = state.category_service.delete_category(id).await?;
    Ok((StatusCode::OK, Json(MessageDto::deleted(&category.name))))
}
