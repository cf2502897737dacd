//! In-memory repositories and app wiring for router tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};

use crate::application::auth_service::AuthService;
use crate::application::category_service::CategoryService;
use crate::application::play_log_service::PlayLogService;
use crate::application::post_service::PostService;
use crate::data::category_repository::CategoryRepository;
use crate::data::play_log_repository::{NewPlayLog, PlayLogRepository};
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::category::{Category, CategoryRef, CategoryWithCount};
use crate::domain::error::DomainError;
use crate::domain::image_host::ImageHostPolicy;
use crate::domain::play_log::PlayLog;
use crate::domain::post::{GameStatus, Post, ValidPost};
use crate::domain::user::User;
use crate::infrastructure::jwt::JwtService;
use crate::infrastructure::settings::Settings;
use crate::presentation::AppState;
use crate::server::build_router;

pub(crate) const TEST_JWT_SECRET: &str = "test-secret-test-secret-test-secret";

#[derive(Debug, Clone)]
struct StoredPost {
    id: i64,
    input: ValidPost,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct Store {
    next_id: i64,
    posts: Vec<StoredPost>,
    categories: Vec<Category>,
    links: Vec<(i64, i64)>,
    play_logs: Vec<PlayLog>,
    users: Vec<UserCredentials>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn assemble(&self, stored: &StoredPost) -> Post {
        let mut categories: Vec<CategoryRef> = self
            .links
            .iter()
            .filter(|(post_id, _)| *post_id == stored.id)
            .filter_map(|(_, category_id)| {
                self.categories
                    .iter()
                    .find(|category| category.id == *category_id)
            })
            .map(|category| CategoryRef {
                id: category.id,
                name: category.name.clone(),
            })
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        Post {
            id: stored.id,
            title: stored.input.title.clone(),
            content: stored.input.content.clone(),
            cover_image_url: stored.input.cover_image_url.clone(),
            status: stored.input.status,
            play_time: stored.input.play_time,
            rating: stored.input.rating,
            categories,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }

    fn check_categories(&self, ids: &[i64]) -> Result<(), DomainError> {
        match ids
            .iter()
            .find(|id| !self.categories.iter().any(|category| category.id == **id))
        {
            Some(id) => Err(DomainError::NotFound(format!("category id: {id}"))),
            None => Ok(()),
        }
    }
}

/// Shared store behind every repository trait, mirroring the cascade rules of
/// the Postgres schema.
#[derive(Clone, Default)]
pub(crate) struct InMemoryLibrary {
    store: Arc<Mutex<Store>>,
}

impl InMemoryLibrary {
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().expect("library mutex poisoned")
    }

    pub(crate) fn seed_category(&self, name: &str) -> i64 {
        let mut store = self.lock();
        let id = store.next_id();
        let now = Utc::now();
        let category = Category::new(id, name, now, now).expect("seed category must be valid");
        store.categories.push(category);
        id
    }

    pub(crate) fn seed_post(
        &self,
        title: &str,
        status: GameStatus,
        play_time: i32,
        category_ids: &[i64],
    ) -> i64 {
        let mut store = self.lock();
        let id = store.next_id();
        let now = Utc::now();
        store.posts.push(StoredPost {
            id,
            input: ValidPost {
                title: title.to_string(),
                content: String::new(),
                cover_image_url: None,
                status,
                play_time,
                rating: 0,
                category_ids: category_ids.to_vec(),
            },
            created_at: now,
            updated_at: now,
        });
        store
            .links
            .extend(category_ids.iter().map(|category_id| (id, *category_id)));
        id
    }

    pub(crate) fn seed_play_log(&self, post_id: i64, content: &str) -> i64 {
        let mut store = self.lock();
        let id = store.next_id();
        let now = Utc::now();
        store.play_logs.push(PlayLog {
            id,
            post_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub(crate) fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    pub(crate) fn play_log_count(&self) -> usize {
        self.lock().play_logs.len()
    }

    pub(crate) fn link_count(&self) -> usize {
        self.lock().links.len()
    }
}

#[async_trait]
impl PostRepository for InMemoryLibrary {
    async fn create_post(&self, input: ValidPost) -> Result<Post, DomainError> {
        let mut store = self.lock();
        store.check_categories(&input.category_ids)?;
        let id = store.next_id();
        let now = Utc::now();
        let links: Vec<_> = input.category_ids.iter().map(|cid| (id, *cid)).collect();
        let stored = StoredPost {
            id,
            input,
            created_at: now,
            updated_at: now,
        };
        store.links.extend(links);
        store.posts.push(stored.clone());
        Ok(store.assemble(&stored))
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let store = self.lock();
        Ok(store
            .posts
            .iter()
            .find(|post| post.id == id)
            .map(|post| store.assemble(post)))
    }

    async fn update_post(&self, id: i64, input: ValidPost) -> Result<Option<Post>, DomainError> {
        let mut store = self.lock();
        let Some(idx) = store.posts.iter().position(|post| post.id == id) else {
            return Ok(None);
        };
        store.check_categories(&input.category_ids)?;

        store.links.retain(|(post_id, _)| *post_id != id);
        let links: Vec<_> = input.category_ids.iter().map(|cid| (id, *cid)).collect();
        store.links.extend(links);

        let post = &mut store.posts[idx];
        post.input = input;
        post.updated_at = Utc::now();
        let stored = post.clone();
        Ok(Some(store.assemble(&stored)))
    }

    async fn delete_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let mut store = self.lock();
        let Some(idx) = store.posts.iter().position(|post| post.id == id) else {
            return Ok(None);
        };
        let post = store.assemble(&store.posts[idx]);
        store.posts.remove(idx);
        store.links.retain(|(post_id, _)| *post_id != id);
        store.play_logs.retain(|log| log.post_id != id);
        Ok(Some(post))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        let store = self.lock();
        let mut posts: Vec<_> = store.posts.iter().map(|post| store.assemble(post)).collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryLibrary {
    async fn create_category(&self, name: &str) -> Result<Category, DomainError> {
        let mut store = self.lock();
        if store.categories.iter().any(|category| category.name == name) {
            return Err(DomainError::AlreadyExists("category name".to_string()));
        }
        let id = store.next_id();
        let now = Utc::now();
        let category = Category::new(id, name, now, now)?;
        store.categories.push(category.clone());
        Ok(category)
    }

    async fn rename_category(&self, id: i64, name: &str) -> Result<Option<Category>, DomainError> {
        let mut store = self.lock();
        if store
            .categories
            .iter()
            .any(|category| category.name == name && category.id != id)
        {
            return Err(DomainError::AlreadyExists("category name".to_string()));
        }
        Ok(store
            .categories
            .iter_mut()
            .find(|category| category.id == id)
            .map(|category| {
                category.name = name.to_string();
                category.updated_at = Utc::now();
                category.clone()
            }))
    }

    async fn delete_category(&self, id: i64) -> Result<Option<Category>, DomainError> {
        let mut store = self.lock();
        let Some(idx) = store.categories.iter().position(|category| category.id == id) else {
            return Ok(None);
        };
        store.links.retain(|(_, category_id)| *category_id != id);
        Ok(Some(store.categories.remove(idx)))
    }

    async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, DomainError> {
        let store = self.lock();
        let mut categories: Vec<_> = store
            .categories
            .iter()
            .map(|category| CategoryWithCount {
                category: category.clone(),
                post_count: store
                    .links
                    .iter()
                    .filter(|(_, category_id)| *category_id == category.id)
                    .count() as i64,
            })
            .collect();
        categories.sort_by(|a, b| {
            b.category
                .created_at
                .cmp(&a.category.created_at)
                .then(b.category.id.cmp(&a.category.id))
        });
        Ok(categories)
    }
}

#[async_trait]
impl PlayLogRepository for InMemoryLibrary {
    async fn create_play_log(&self, input: NewPlayLog) -> Result<PlayLog, DomainError> {
        let mut store = self.lock();
        if !store.posts.iter().any(|post| post.id == input.post_id) {
            return Err(DomainError::NotFound(format!("post id: {}", input.post_id)));
        }
        let id = store.next_id();
        let now = Utc::now();
        let log = PlayLog {
            id,
            post_id: input.post_id,
            content: input.content,
            created_at: now,
            updated_at: now,
        };
        store.play_logs.push(log.clone());
        Ok(log)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<PlayLog>, DomainError> {
        let store = self.lock();
        let mut logs: Vec<_> = store
            .play_logs
            .iter()
            .filter(|log| log.post_id == post_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(logs)
    }
}

#[async_trait]
impl UserRepository for InMemoryLibrary {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut store = self.lock();
        if store.users.iter().any(|creds| creds.user.email == input.email) {
            return Err(DomainError::AlreadyExists("email".to_string()));
        }
        let id = store.next_id();
        let user = User::new(id, input.email, Utc::now())?;
        store.users.push(UserCredentials {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|creds| creds.user.email == email)
            .cloned())
    }
}

pub(crate) fn test_settings() -> Settings {
    Settings {
        database_url: "postgres://unused".to_string(),
        database_max_connections: 1,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_ttl_seconds: 3600,
        http_addr: "127.0.0.1:0".to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
        log_level: "info".to_string(),
        http_request_body_limit_bytes: 64 * 1024,
        http_concurrency_limit: 16,
        http_request_timeout_secs: 5,
        image_host_allowlist: vec!["placehold.jp".to_string()],
        registration_enabled: true,
        seed_demo_data: false,
    }
}

pub(crate) fn test_state(library: &InMemoryLibrary, settings: &Settings) -> AppState {
    let jwt = Arc::new(JwtService::new(
        &settings.jwt_secret,
        settings.jwt_ttl_seconds,
    ));
    let repo = Arc::new(library.clone());

    AppState::new(
        Arc::new(AuthService::new(
            repo.clone(),
            jwt.clone(),
            settings.registration_enabled,
        )),
        Arc::new(PostService::new(
            repo.clone(),
            repo.clone(),
            ImageHostPolicy::new(&settings.image_host_allowlist),
        )),
        Arc::new(CategoryService::new(repo.clone())),
        Arc::new(PlayLogService::new(repo)),
        jwt,
    )
}

pub(crate) fn test_app() -> (Router, InMemoryLibrary) {
    let library = InMemoryLibrary::default();
    let settings = test_settings();
    let app = build_router(test_state(&library, &settings), &settings)
        .expect("test router must build");
    (app, library)
}

pub(crate) fn admin_token() -> String {
    JwtService::new(TEST_JWT_SECRET, 3600)
        .generate_token(1, "admin@example.com")
        .expect("token must be generated")
}
