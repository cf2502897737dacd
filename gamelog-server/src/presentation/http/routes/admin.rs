use axum::Router;
use axum::middleware;
use axum::routing::{post, put};

use crate::presentation::AppState;
use crate::presentation::http::handlers::categories::{
    create_category, delete_category, rename_category,
};
use crate::presentation::http::handlers::play_logs::create_play_log;
use crate::presentation::http::handlers::posts::{create_post, delete_post, update_post};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

/// Every write endpoint; all of them require a bearer token.
pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/posts", post(create_post))
        .route("/admin/posts/{id}", put(update_post).delete(delete_post))
        .route("/admin/categories", post(create_category))
        .route(
            "/admin/categories/{id}",
            put(rename_category).delete(delete_category),
        )
        .route("/play-logs", post(create_play_log))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
