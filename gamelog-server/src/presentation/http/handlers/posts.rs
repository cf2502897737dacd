use std::str::FromStr;

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::MessageDto;
use super::play_logs::PlayLogDto;
use crate::domain::category::CategoryRef;
use crate::domain::filter::PostFilter;
use crate::domain::post::{GameStatus, Post, PostDetail, PostRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppError, AppResult};
use crate::presentation::http::extract::{ApiJson, ApiPath, ApiQuery};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum StatusDto {
    Unplayed,
    Playing,
    Completed,
    Perfect,
}

impl From<GameStatus> for StatusDto {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Unplayed => StatusDto::Unplayed,
            GameStatus::Playing => StatusDto::Playing,
            GameStatus::Completed => StatusDto::Completed,
            GameStatus::Perfect => StatusDto::Perfect,
        }
    }
}

/// Body of create and update. Update replaces every field and the whole
/// category set.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct PostWriteDto {
    #[validate(length(min = 1))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) content: String,
    pub(crate) cover_image_url: Option<String>,
    /// One of UNPLAYED, PLAYING, COMPLETED, PERFECT. Defaults to UNPLAYED.
    #[schema(value_type = Option<StatusDto>)]
    pub(crate) status: Option<String>,
    /// Minutes played.
    #[validate(range(min = 0))]
    pub(crate) play_time: Option<i64>,
    #[validate(range(min = 0, max = 5))]
    pub(crate) rating: Option<i64>,
    #[serde(default)]
    pub(crate) category_ids: Vec<i64>,
}

impl PostWriteDto {
    fn into_request(self) -> AppResult<PostRequest> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => GameStatus::default(),
            Some(raw) => GameStatus::from_str(raw)?,
        };

        Ok(PostRequest {
            title: self.title,
            content: self.content,
            cover_image_url: self.cover_image_url,
            status,
            play_time: self.play_time.unwrap_or(0),
            rating: self.rating.unwrap_or(0),
            category_ids: self.category_ids,
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct ListPostsQuery {
    /// UNPLAYED, PLAYING, COMPLETED or PERFECT
    pub(crate) status: Option<String>,
    /// Case-insensitive text searched in title and notes
    pub(crate) q: Option<String>,
    pub(crate) category_id: Option<i64>,
    /// First creation day, YYYY-MM-DD
    pub(crate) from: Option<String>,
    /// Last creation day, YYYY-MM-DD
    pub(crate) to: Option<String>,
}

impl ListPostsQuery {
    fn into_filter(self) -> AppResult<PostFilter> {
        let status = non_blank(self.status.as_deref())
            .map(GameStatus::from_str)
            .transpose()?;
        let from = parse_day("from", self.from.as_deref())?;
        let to = parse_day("to", self.to.as_deref())?;

        Ok(PostFilter::new(
            status,
            self.q.as_deref(),
            self.category_id,
            from,
            to,
        )?)
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_day(name: &str, raw: Option<&str>) -> AppResult<Option<NaiveDate>> {
    non_blank(raw)
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                AppError::BadRequest(format!("'{name}' must be a date in YYYY-MM-DD format"))
            })
        })
        .transpose()
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryRefDto {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl From<CategoryRef> for CategoryRefDto {
    fn from(category: CategoryRef) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) cover_image_url: Option<String>,
    pub(crate) status: StatusDto,
    pub(crate) play_time: i32,
    pub(crate) rating: i16,
    pub(crate) categories: Vec<CategoryRefDto>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            cover_image_url: post.cover_image_url,
            status: post.status.into(),
            play_time: post.play_time,
            rating: post.rating,
            categories: post.categories.into_iter().map(CategoryRefDto::from).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDetailDto {
    #[serde(flatten)]
    pub(crate) post: PostDto,
    pub(crate) play_logs: Vec<PlayLogDto>,
}

impl From<PostDetail> for PostDetailDto {
    fn from(detail: PostDetail) -> Self {
        Self {
            post: detail.post.into(),
            play_logs: detail.play_logs.into_iter().map(PlayLogDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ListPostsResponseDto {
    pub(crate) posts: Vec<PostDto>,
    pub(crate) total: usize,
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Posts listed, newest first", body = ListPostsResponseDto),
        (status = 400, description = "Invalid filter"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListPostsQuery>,
) -> AppResult<(StatusCode, Json<ListPostsResponseDto>)> {
    let filter = query.into_filter()?;
    let posts = state.post_service.list_posts(&filter).await?;

    Ok((
        StatusCode::OK,
        Json(ListPostsResponseDto {
            total: posts.len(),
            posts: posts.into_iter().map(PostDto::from).collect(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post with categories and play logs", body = PostDetailDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<(StatusCode, Json<PostDetailDto>)> {
    let detail = state.post_service.get_post(id).await?;

    Ok((StatusCode::OK, Json(PostDetailDto::from(detail))))
}

#[utoipa::path(
    post,
    path = "/api/admin/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = PostWriteDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown category id"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    ApiJson(dto): ApiJson<PostWriteDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = dto.into_request()?;

    let post = state.post_service.create_post(req).await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(post))))
}

#[utoipa::path(
    put,
    path = "/api/admin/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = PostWriteDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post or category not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(dto): ApiJson<PostWriteDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = dto.into_request()?;

    let post = state.post_service.update_post(id, req).await?;
    Ok((StatusCode::OK, Json(PostDto::from(post))))
}

#[utoipa::path(
    delete,
    path = "/api/admin/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post deleted with its play logs", body = MessageDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<(StatusCode, Json<MessageDto>)> {
    info!(user_id = auth.user_id, email = %auth.email, post_id = id, "post delete requested");
    let post = state.post_service.delete_post(id).await?;
    Ok((StatusCode::OK, Json(MessageDto::deleted(&post.title))))
}
