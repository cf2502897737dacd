use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::handlers::MessageDto;
use crate::presentation::http::handlers::auth::{AuthResponseDto, LoginDto, RegisterDto, UserDto};
use crate::presentation::http::handlers::categories::{
    CategoryDto, CategoryWithCountDto, CategoryWriteDto,
};
use crate::presentation::http::handlers::play_logs::{CreatePlayLogDto, PlayLogDto};
use crate::presentation::http::handlers::posts::{
    CategoryRefDto, ListPostsResponseDto, PostDetailDto, PostDto, PostWriteDto, StatusDto,
};
use crate::presentation::http::handlers::stats::StatsDto;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::auth::register,
        crate::presentation::http::handlers::auth::login,
        crate::presentation::http::handlers::posts::list_posts,
        crate::presentation::http::handlers::posts::get_post,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::update_post,
        crate::presentation::http::handlers::posts::delete_post,
        crate::presentation::http::handlers::categories::list_categories,
        crate::presentation::http::handlers::categories::create_category,
        crate::presentation::http::handlers::categories::rename_category,
        crate::presentation::http::handlers::categories::delete_category,
        crate::presentation::http::handlers::play_logs::create_play_log,
        crate::presentation::http::handlers::stats::get_stats
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            StatusDto,
            PostWriteDto,
            PostDto,
            PostDetailDto,
            CategoryRefDto,
            ListPostsResponseDto,
            CategoryWriteDto,
            CategoryDto,
            CategoryWithCountDto,
            CreatePlayLogDto,
            PlayLogDto,
            StatsDto,
            MessageDto
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "posts", description = "Game entries"),
        (name = "categories", description = "Platform and genre tags"),
        (name = "play-logs", description = "Play diary entries"),
        (name = "stats", description = "Library statistics")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
