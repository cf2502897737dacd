use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::category_service::CategoryService;
use crate::application::play_log_service::PlayLogService;
use crate::application::post_service::PostService;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod http;
pub(crate) mod openapi;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService>,
    pub(crate) post_service: Arc<PostService>,
    pub(crate) category_service: Arc<CategoryService>,
    pub(crate) play_log_service: Arc<PlayLogService>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(
        auth_service: Arc<AuthService>,
        post_service: Arc<PostService>,
        category_service: Arc<CategoryService>,
        play_log_service: Arc<PlayLogService>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            auth_service,
            post_service,
            category_service,
            play_log_service,
            jwt,
        }
    }
}
