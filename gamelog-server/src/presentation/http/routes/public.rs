use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::categories::list_categories;
use crate::presentation::http::handlers::posts::{get_post, list_posts};
use crate::presentation::http::handlers::stats::get_stats;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/{id}", get(get_post))
        .route("/categories", get(list_categories))
        .route("/stats", get(get_stats))
}
