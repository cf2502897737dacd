use axum::Router;

use crate::presentation::AppState;

pub(crate) mod admin;
pub(crate) mod auth;
pub(crate) mod public;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api", public::router().merge(admin::router(state)))
}
