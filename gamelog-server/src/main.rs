use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

#[cfg(test)]
mod testing;

use application::auth_service::AuthService;
use application::category_service::CategoryService;
use application::play_log_service::PlayLogService;
use application::post_service::PostService;
use data::repositories::postgres::category_repository::PostgresCategoryRepository;
use data::repositories::postgres::play_log_repository::PostgresPlayLogRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use domain::image_host::ImageHostPolicy;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::seed::seed_demo_data;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    if settings.seed_demo_data {
        seed_demo_data(&pool).await?;
    }

    let jwt = Arc::new(JwtService::new(
        &settings.jwt_secret,
        settings.jwt_ttl_seconds,
    ));
    let images = ImageHostPolicy::new(&settings.image_host_allowlist);
    let play_logs = Arc::new(PostgresPlayLogRepository::new(pool.clone()));

    let auth_service = Arc::new(AuthService::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        jwt.clone(),
        settings.registration_enabled,
    ));
    let post_service = Arc::new(PostService::new(
        Arc::new(PostgresPostRepository::new(pool.clone())),
        play_logs.clone(),
        images,
    ));
    let category_service = Arc::new(CategoryService::new(Arc::new(
        PostgresCategoryRepository::new(pool.clone()),
    )));
    let play_log_service = Arc::new(PlayLogService::new(play_logs));

    let state = AppState::new(
        auth_service,
        post_service,
        category_service,
        play_log_service,
        jwt,
    );

    info!(
        registration_enabled = settings.registration_enabled,
        "gamelog server starting"
    );
    server::run_http(&settings, state).await?;

    pool.close().await;
    Ok(())
}
