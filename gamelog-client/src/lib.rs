//! Client library for the gamelog REST API.
//!
//! `GameLogClient` keeps the JWT returned by `register`/`login` and sends it
//! with every write operation.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{GameLogClientError, GameLogClientResult};
pub use models::{
    AuthResponse, Category, CategoryRef, CategorySummary, GameStatus, ListPostsQuery,
    ListPostsResponse, PlayLog, Post, PostDetail, PostInput, Stats, User,
};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Client for a gamelog server.
pub struct GameLogClient {
    http: HttpClient,
    token: Option<String>,
}

impl GameLogClient {
    /// Creates a client for a server base URL such as `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> GameLogClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            token: None,
        })
    }

    /// Sets the JWT explicitly, e.g. one restored from disk.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Returns the current JWT, if any.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Forgets the stored JWT.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Registers an account and keeps the returned token.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
    ) -> GameLogClientResult<AuthResponse> {
        let result = self.http.register(email, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Logs in and keeps the returned token.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> GameLogClientResult<AuthResponse> {
        let result = self.http.login(email, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Lists posts matching the filters, newest first.
    pub async fn list_posts(
        &self,
        query: &ListPostsQuery,
    ) -> GameLogClientResult<ListPostsResponse> {
        self.http.list_posts(query).await
    }

    /// Returns a post with its categories and play logs.
    pub async fn get_post(&self, id: i64) -> GameLogClientResult<PostDetail> {
        self.http.get_post(id).await
    }

    /// Creates a post. Requires a token.
    pub async fn create_post(&self, input: &PostInput) -> GameLogClientResult<Post> {
        let token = self.require_token()?;
        self.http.create_post(token, input).await
    }

    /// Replaces every field and the category set of a post. Requires a token.
    pub async fn update_post(&self, id: i64, input: &PostInput) -> GameLogClientResult<Post> {
        let token = self.require_token()?;
        self.http.update_post(token, id, input).await
    }

    /// Deletes a post with its play logs and returns the server's
    /// confirmation. Requires a token.
    pub async fn delete_post(&self, id: i64) -> GameLogClientResult<String> {
        let token = self.require_token()?;
        self.http.delete_post(token, id).await
    }

    /// Lists categories with their post counts, newest first.
    pub async fn list_categories(&self) -> GameLogClientResult<Vec<CategorySummary>> {
        self.http.list_categories().await
    }

    /// Creates a category. Requires a token.
    pub async fn create_category(&self, name: &str) -> GameLogClientResult<Category> {
        let token = self.require_token()?;
        self.http.create_category(token, name).await
    }

    /// Renames a category. Requires a token.
    pub async fn rename_category(&self, id: i64, name: &str) -> GameLogClientResult<Category> {
        let token = self.require_token()?;
        self.http.rename_category(token, id, name).await
    }

    /// Deletes a category; linked posts are kept. Requires a token.
    pub async fn delete_category(&self, id: i64) -> GameLogClientResult<String> {
        let token = self.require_token()?;
        self.http.delete_category(token, id).await
    }

    /// Adds a diary entry to a post. Requires a token.
    pub async fn add_play_log(&self, post_id: i64, content: &str) -> GameLogClientResult<PlayLog> {
        let token = self.require_token()?;
        self.http.add_play_log(token, post_id, content).await
    }

    /// Returns library statistics.
    pub async fn stats(&self) -> GameLogClientResult<Stats> {
        self.http.stats().await
    }

    fn require_token(&self) -> GameLogClientResult<&str> {
        self.token
            .as_deref()
            .ok_or(GameLogClientError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::{GameLogClient, GameLogClientError, PostInput};

    #[tokio::test]
    async fn writes_without_token_fail_before_sending() {
        let client = GameLogClient::new("http://127.0.0.1:9").expect("client must build");

        let err = client
            .create_post(&PostInput::default())
            .await
            .expect_err("must require token");
        assert!(matches!(err, GameLogClientError::Unauthorized));

        let err = client
            .delete_category(1)
            .await
            .expect_err("must require token");
        assert!(matches!(err, GameLogClientError::Unauthorized));
    }

    #[test]
    fn token_can_be_set_and_cleared() {
        let mut client = GameLogClient::new("http://127.0.0.1:8080").expect("client must build");
        assert!(client.get_token().is_none());

        client.set_token("abc");
        assert_eq!(client.get_token(), Some("abc"));

        client.clear_token();
        assert!(client.get_token().is_none());
    }
}
