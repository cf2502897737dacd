use std::sync::Arc;

use tracing::info;

use crate::data::play_log_repository::{NewPlayLog, PlayLogRepository};
use crate::domain::error::DomainError;
use crate::domain::play_log::{CreatePlayLogRequest, PlayLog};

pub(crate) struct PlayLogService {
    repo: Arc<dyn PlayLogRepository>,
}

impl PlayLogService {
    pub(crate) fn new(repo: Arc<dyn PlayLogRepository>) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_play_log(
        &self,
        req: CreatePlayLogRequest,
    ) -> Result<PlayLog, DomainError> {
        let req = req.validate()?;
        let log = self
            .repo
            .create_play_log(NewPlayLog {
                post_id: req.post_id,
                content: req.content,
            })
            .await?;
        info!(play_log_id = log.id, post_id = log.post_id, "play log added");
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::PlayLogService;
    use crate::data::play_log_repository::{NewPlayLog, PlayLogRepository};
    use crate::domain::error::DomainError;
    use crate::domain::play_log::{CreatePlayLogRequest, PlayLog};

    #[derive(Clone, Default)]
    struct FakePlayLogRepo {
        known_posts: Arc<Mutex<Vec<i64>>>,
        created_input: Arc<Mutex<Option<NewPlayLog>>>,
    }

    #[async_trait]
    impl PlayLogRepository for FakePlayLogRepo {
        async fn create_play_log(&self, input: NewPlayLog) -> Result<PlayLog, DomainError> {
            let known = self
                .known_posts
                .lock()
                .expect("known_posts mutex poisoned")
                .contains(&input.post_id);
            if !known {
                return Err(DomainError::NotFound(format!("post id: {}", input.post_id)));
            }
            *self
                .created_input
                .lock()
                .expect("created_input mutex poisoned") = Some(input.clone());
            let now = Utc::now();
            Ok(PlayLog {
                id: 1,
                post_id: input.post_id,
                content: input.content,
                created_at: now,
                updated_at: now,
            })
        }

        async fn list_for_post(&self, _post_id: i64) -> Result<Vec<PlayLog>, DomainError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn create_play_log_passes_trimmed_content() {
        let repo = FakePlayLogRepo::default();
        repo.known_posts
            .lock()
            .expect("known_posts mutex poisoned")
            .push(2);
        let service = PlayLogService::new(Arc::new(repo.clone()));

        let log = service
            .create_play_log(CreatePlayLogRequest {
                post_id: 2,
                content: "  Beat Malenia.  ".to_string(),
            })
            .await
            .expect("create must succeed");
        assert_eq!(log.post_id, 2);
        assert_eq!(log.content, "Beat Malenia.");
    }

    #[tokio::test]
    async fn create_play_log_for_missing_post_is_not_found() {
        let repo = FakePlayLogRepo::default();
        let service = PlayLogService::new(Arc::new(repo.clone()));

        let err = service
            .create_play_log(CreatePlayLogRequest {
                post_id: 99,
                content: "entry".to_string(),
            })
            .await
            .expect_err("missing post must fail");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_play_log_rejects_empty_content_before_repo() {
        let repo = FakePlayLogRepo::default();
        let service = PlayLogService::new(Arc::new(repo.clone()));

        let err = service
            .create_play_log(CreatePlayLogRequest {
                post_id: 2,
                content: "   ".to_string(),
            })
            .await
            .expect_err("empty content must fail");
        assert!(matches!(err, DomainError::Validation { field: "content", .. }));
        assert!(
            repo.created_input
                .lock()
                .expect("created_input mutex poisoned")
                .is_none()
        );
    }
}
