use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::play_log::{CreatePlayLogRequest, PlayLog};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::ApiJson;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePlayLogDto {
    #[validate(range(min = 1))]
    pub(crate) post_id: i64,
    #[validate(length(min = 1))]
    pub(crate) content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PlayLogDto {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<PlayLog> for PlayLogDto {
    fn from(log: PlayLog) -> Self {
        Self {
            id: log.id,
            post_id: log.post_id,
            content: log.content,
            created_at: log.created_at,
            updated_at: log.updated_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/play-logs",
    tag = "play-logs",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePlayLogDto,
    responses(
        (status = 201, description = "Play log added", body = PlayLogDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_play_log(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    ApiJson(dto): ApiJson<CreatePlayLogDto>,
) -> AppResult<(StatusCode, Json<PlayLogDto>)> {
    dto.validate()?;
    let req = CreatePlayLogRequest {
        post_id: dto.post_id,
        content: dto.content,
    };

    let log = state.play_log_service.create_play_log(req).await?;
    Ok((StatusCode::CREATED, Json(PlayLogDto::from(log))))
}
