use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgExecutor, PgPool};
use tracing::error;

use crate::data::post_repository::PostRepository;
use crate::domain::category::CategoryRef;
use crate::domain::error::DomainError;
use crate::domain::post::{GameStatus, Post, ValidPost};

const POST_COLUMNS: &str =
    "id, title, content, cover_image_url, status, play_time, rating, created_at, updated_at";

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    cover_image_url: Option<String>,
    status: String,
    play_time: i32,
    rating: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct PostCategoryRow {
    post_id: i64,
    id: i64,
    name: String,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: ValidPost) -> Result<Post, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_post_db_error)?;

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts (title, content, cover_image_url, status, play_time, rating)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.cover_image_url)
        .bind(input.status.as_str())
        .bind(input.play_time)
        .bind(input.rating)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_post_db_error)?;

        link_categories(&mut tx, row.id, &input.category_ids).await?;
        let mut categories = load_categories(&mut *tx, &[row.id]).await?;

        tx.commit().await.map_err(map_post_db_error)?;

        let categories = categories.remove(&row.id).unwrap_or_default();
        map_row_to_post(row, categories)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut categories = load_categories(&self.pool, &[row.id]).await?;
        let categories = categories.remove(&row.id).unwrap_or_default();
        map_row_to_post(row, categories).map(Some)
    }

    async fn update_post(&self, id: i64, input: ValidPost) -> Result<Option<Post>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_post_db_error)?;

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET title = $2,
                content = $3,
                cover_image_url = $4,
                status = $5,
                play_time = $6,
                rating = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.cover_image_url)
        .bind(input.status.as_str())
        .bind(input.play_time)
        .bind(input.rating)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_post_db_error)?;

        // dropping the transaction rolls it back
        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            DELETE FROM post_categories
            WHERE post_id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_post_db_error)?;

        link_categories(&mut tx, id, &input.category_ids).await?;
        let mut categories = load_categories(&mut *tx, &[id]).await?;

        tx.commit().await.map_err(map_post_db_error)?;

        let categories = categories.remove(&id).unwrap_or_default();
        map_row_to_post(row, categories).map(Some)
    }

    async fn delete_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_post_db_error)?;
        let mut categories = load_categories(&mut *tx, &[id]).await?;

        // play_logs and post_categories go with the post (ON DELETE CASCADE)
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            DELETE FROM posts
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_post_db_error)?;

        tx.commit().await.map_err(map_post_db_error)?;

        row.map(|row| {
            let categories = categories.remove(&row.id).unwrap_or_default();
            map_row_to_post(row, categories)
        })
        .transpose()
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut categories = load_categories(&self.pool, &ids).await?;

        rows.into_iter()
            .map(|row| {
                let post_categories = categories.remove(&row.id).unwrap_or_default();
                map_row_to_post(row, post_categories)
            })
            .collect()
    }
}

async fn link_categories(
    conn: &mut PgConnection,
    post_id: i64,
    category_ids: &[i64],
) -> Result<(), DomainError> {
    if category_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO post_categories (post_id, category_id)
        SELECT $1, category_id
        FROM UNNEST($2::BIGINT[]) AS ids(category_id)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(category_ids)
    .execute(conn)
    .await
    .map_err(map_post_db_error)?;

    Ok(())
}

async fn load_categories<'e, E>(
    executor: E,
    post_ids: &[i64],
) -> Result<HashMap<i64, Vec<CategoryRef>>, DomainError>
where
    E: PgExecutor<'e>,
{
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, PostCategoryRow>(
        r#"
        SELECT pc.post_id, c.id, c.name
        FROM post_categories pc
        JOIN categories c ON c.id = pc.category_id
        WHERE pc.post_id = ANY($1)
        ORDER BY c.name ASC, c.id ASC
        "#,
    )
    .bind(post_ids)
    .fetch_all(executor)
    .await
    .map_err(map_post_db_error)?;

    let mut grouped: HashMap<i64, Vec<CategoryRef>> = HashMap::new();
    for row in rows {
        grouped.entry(row.post_id).or_default().push(CategoryRef {
            id: row.id,
            name: row.name,
        });
    }
    Ok(grouped)
}

fn map_row_to_post(row: PostRow, categories: Vec<CategoryRef>) -> Result<Post, DomainError> {
    let status: GameStatus = row
        .status
        .parse()
        .map_err(|err: DomainError| DomainError::Unexpected(err.to_string()))?;

    Post {
        id: row.id,
        title: row.title,
        content: row.content,
        cover_image_url: row.cover_image_url,
        status,
        play_time: row.play_time,
        rating: row.rating,
        categories,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
    .validated()
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound("category".to_string());
    }
    error!(error = %err, "post query failed");
    DomainError::Unexpected(err.to_string())
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::PostgresPostRepository;
    use crate::data::post_repository::PostRepository;
    use crate::data::repositories::postgres::category_repository::PostgresCategoryRepository;
    use crate::data::category_repository::CategoryRepository;
    use crate::data::play_log_repository::{NewPlayLog, PlayLogRepository};
    use crate::data::repositories::postgres::play_log_repository::PostgresPlayLogRepository;
    use crate::domain::error::DomainError;
    use crate::domain::post::{GameStatus, ValidPost};

    fn game(title: &str, category_ids: Vec<i64>) -> ValidPost {
        ValidPost {
            title: title.to_string(),
            content: "notes".to_string(),
            cover_image_url: None,
            status: GameStatus::Playing,
            play_time: 90,
            rating: 4,
            category_ids,
        }
    }

    async fn count(pool: &PgPool, sql: &str, id: i64) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .bind(id)
            .fetch_one(pool)
            .await
            .expect("count query must succeed")
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn create_and_update_replace_category_set(pool: PgPool) {
        let categories = PostgresCategoryRepository::new(pool.clone());
        let pc = categories.create_category("PC").await.expect("category");
        let rpg = categories.create_category("RPG").await.expect("category");
        let indie = categories.create_category("Indie").await.expect("category");

        let posts = PostgresPostRepository::new(pool.clone());
        let created = posts
            .create_post(game("Baldur's Gate 3", vec![pc.id, rpg.id]))
            .await
            .expect("create must succeed");
        let names: Vec<_> = created.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["PC", "RPG"]);

        let updated = posts
            .update_post(created.id, game("Baldur's Gate 3", vec![indie.id]))
            .await
            .expect("update must succeed")
            .expect("post must exist");
        assert_eq!(updated.categories.len(), 1);
        assert_eq!(updated.categories[0].id, indie.id);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn unknown_category_is_not_found_and_rolls_back(pool: PgPool) {
        let posts = PostgresPostRepository::new(pool.clone());
        let err = posts
            .create_post(game("Celeste", vec![999_999]))
            .await
            .expect_err("unknown category must fail");
        assert!(matches!(err, DomainError::NotFound(_)));

        let listed = posts.list_posts().await.expect("list must succeed");
        assert!(listed.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn delete_post_removes_logs_and_links(pool: PgPool) {
        let categories = PostgresCategoryRepository::new(pool.clone());
        let pc = categories.create_category("PC").await.expect("category");

        let posts = PostgresPostRepository::new(pool.clone());
        let post = posts
            .create_post(game("VALORANT", vec![pc.id]))
            .await
            .expect("create must succeed");

        let logs = PostgresPlayLogRepository::new(pool.clone());
        logs.create_play_log(NewPlayLog {
            post_id: post.id,
            content: "promoted to diamond".to_string(),
        })
        .await
        .expect("log must be created");

        let deleted = posts
            .delete_post(post.id)
            .await
            .expect("delete must succeed")
            .expect("post must exist");
        assert_eq!(deleted.title, "VALORANT");

        let link_sql = "SELECT COUNT(*) FROM post_categories WHERE post_id = $1";
        let log_sql = "SELECT COUNT(*) FROM play_logs WHERE post_id = $1";
        assert_eq!(count(&pool, link_sql, post.id).await, 0);
        assert_eq!(count(&pool, log_sql, post.id).await, 0);

        let listed = categories.list_categories().await.expect("list");
        assert_eq!(listed.len(), 1, "category must survive post deletion");
        assert_eq!(listed[0].post_count, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn list_posts_is_newest_first(pool: PgPool) {
        let posts = PostgresPostRepository::new(pool.clone());
        let first = posts.create_post(game("Hades", vec![])).await.expect("create");
        let second = posts.create_post(game("Celeste", vec![])).await.expect("create");

        let listed = posts.list_posts().await.expect("list must succeed");
        let ids: Vec<_> = listed.iter().map(|post| post.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
