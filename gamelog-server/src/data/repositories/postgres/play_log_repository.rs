use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::error;

use crate::data::play_log_repository::{NewPlayLog, PlayLogRepository};
use crate::domain::error::DomainError;
use crate::domain::play_log::PlayLog;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPlayLogRepository {
    pool: PgPool,
}

impl PostgresPlayLogRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PlayLogRow {
    id: i64,
    post_id: i64,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PlayLogRow> for PlayLog {
    fn from(row: PlayLogRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PlayLogRepository for PostgresPlayLogRepository {
    async fn create_play_log(&self, input: NewPlayLog) -> Result<PlayLog, DomainError> {
        let row = sqlx::query_as::<_, PlayLogRow>(
            r#"
            INSERT INTO play_logs (post_id, content)
            VALUES ($1, $2)
            RETURNING id, post_id, content, created_at, updated_at
            "#,
        )
        .bind(input.post_id)
        .bind(&input.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_play_log_db_error(err, input.post_id))?;

        Ok(row.into())
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<PlayLog>, DomainError> {
        let rows = sqlx::query_as::<_, PlayLogRow>(
            r#"
            SELECT id, post_id, content, created_at, updated_at
            FROM play_logs
            WHERE post_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| map_play_log_db_error(err, post_id))?;

        Ok(rows.into_iter().map(PlayLog::from).collect())
    }
}

fn map_play_log_db_error(err: sqlx::Error, post_id: i64) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound(format!("post id: {post_id}"));
    }
    error!(error = %err, post_id, "play log query failed");
    DomainError::Unexpected(err.to_string())
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::PostgresPlayLogRepository;
    use crate::data::play_log_repository::{NewPlayLog, PlayLogRepository};
    use crate::domain::error::DomainError;

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn log_for_missing_post_is_not_found(pool: PgPool) {
        let repo = PostgresPlayLogRepository::new(pool);
        let err = repo
            .create_play_log(NewPlayLog {
                post_id: 12345,
                content: "orphan".to_string(),
            })
            .await
            .expect_err("missing post must fail");
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
