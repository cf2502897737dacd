use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::stats::LibraryStats;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct StatsDto {
    pub(crate) total: u64,
    pub(crate) unplayed: u64,
    pub(crate) playing: u64,
    pub(crate) completed: u64,
    pub(crate) perfect: u64,
    pub(crate) total_play_minutes: u64,
    /// Whole hours, rounded down.
    pub(crate) total_play_hours: u64,
    /// Share of COMPLETED and PERFECT posts, percent rounded to nearest.
    pub(crate) clear_rate: u64,
    pub(crate) backlog_warning: bool,
}

impl From<LibraryStats> for StatsDto {
    fn from(stats: LibraryStats) -> Self {
        Self {
            total_play_hours: stats.total_play_hours(),
            clear_rate: stats.clear_rate(),
            backlog_warning: stats.backlog_warning(),
            total: stats.total,
            unplayed: stats.unplayed,
            playing: stats.playing,
            completed: stats.completed,
            perfect: stats.perfect,
            total_play_minutes: stats.total_play_minutes,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Library statistics", body = StatsDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_stats(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<StatsDto>)> {
    let stats = state.post_service.stats().await?;
    Ok((StatusCode::OK, Json(StatsDto::from(stats))))
}
