use std::sync::Arc;

use tracing::info;

use crate::data::play_log_repository::PlayLogRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::filter::PostFilter;
use crate::domain::image_host::ImageHostPolicy;
use crate::domain::post::{Post, PostDetail, PostRequest};
use crate::domain::stats::LibraryStats;

pub(crate) struct PostService {
    posts: Arc<dyn PostRepository>,
    play_logs: Arc<dyn PlayLogRepository>,
    images: ImageHostPolicy,
}

impl PostService {
    pub(crate) fn new(
        posts: Arc<dyn PostRepository>,
        play_logs: Arc<dyn PlayLogRepository>,
        images: ImageHostPolicy,
    ) -> Self {
        Self {
            posts,
            play_logs,
            images,
        }
    }

    pub(crate) async fn create_post(&self, req: PostRequest) -> Result<Post, DomainError> {
        let input = req.validate(&self.images)?;
        let post = self.posts.create_post(input).await?;
        info!(post_id = post.id, status = %post.status, "post created");
        Ok(post)
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<PostDetail, DomainError> {
        let post = self
            .posts
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {id}")))?;
        let play_logs = self.play_logs.list_for_post(id).await?;

        Ok(PostDetail { post, play_logs })
    }

    pub(crate) async fn update_post(&self, id: i64, req: PostRequest) -> Result<Post, DomainError> {
        let input = req.validate(&self.images)?;
        let post = self
            .posts
            .update_post(id, input)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {id}")))?;
        info!(post_id = post.id, status = %post.status, "post updated");
        Ok(post)
    }

    /// Returns the deleted post so callers can name it back to the user.
    pub(crate) async fn delete_post(&self, id: i64) -> Result<Post, DomainError> {
        let post = self
            .posts
            .delete_post(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {id}")))?;
        info!(post_id = post.id, "post deleted");
        Ok(post)
    }

    pub(crate) async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, DomainError> {
        let posts = self.posts.list_posts().await?;
        Ok(filter.apply(posts))
    }

    pub(crate) async fn stats(&self) -> Result<LibraryStats, DomainError> {
        let posts = self.posts.list_posts().await?;
        Ok(LibraryStats::from_posts(&posts))
    }
}
