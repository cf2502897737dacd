use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{GameLogClientError, GameLogClientResult};
use crate::models::{
    AuthResponse, Category, CategorySummary, ListPostsQuery, ListPostsResponse, PlayLog, Post,
    PostDetail, PostInput, Stats,
};

#[derive(Debug, Serialize)]
struct CredentialsDto<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CategoryWriteDto<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePlayLogDto<'a> {
    post_id: i64,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageDto {
    message: String,
}

#[derive(Debug, Clone)]
/// HTTP transport for the gamelog REST API.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    pub(crate) fn new(base_url: impl Into<String>) -> GameLogClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> GameLogClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body
                .error
                .unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        GameLogClientError::from_http_status(status, Some(message))
    }

    async fn execute<TRes>(request: RequestBuilder) -> GameLogClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(GameLogClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<TRes>()
            .await
            .map_err(GameLogClientError::from_reqwest)
    }

    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
        token: Option<&str>,
    ) -> GameLogClientResult<TRes>
    where
        TReq: Serialize + ?Sized,
        TRes: DeserializeOwned,
    {
        Self::execute(self.request(method, path, token).json(body)).await
    }

    pub(crate) async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> GameLogClientResult<AuthResponse> {
        self.send_json(
            Method::POST,
            "/api/auth/register",
            &CredentialsDto { email, password },
            None,
        )
        .await
    }

    pub(crate) async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> GameLogClientResult<AuthResponse> {
        self.send_json(
            Method::POST,
            "/api/auth/login",
            &CredentialsDto { email, password },
            None,
        )
        .await
    }

    pub(crate) async fn list_posts(
        &self,
        query: &ListPostsQuery,
    ) -> GameLogClientResult<ListPostsResponse> {
        Self::execute(self.request(Method::GET, "/api/posts", None).query(query)).await
    }

    pub(crate) async fn get_post(&self, id: i64) -> GameLogClientResult<PostDetail> {
        Self::execute(self.request(Method::GET, &format!("/api/posts/{id}"), None)).await
    }

    pub(crate) async fn create_post(
        &self,
        token: &str,
        input: &PostInput,
    ) -> GameLogClientResult<Post> {
        self.send_json(Method::POST, "/api/admin/posts", input, Some(token))
            .await
    }

    pub(crate) async fn update_post(
        &self,
        token: &str,
        id: i64,
        input: &PostInput,
    ) -> GameLogClientResult<Post> {
        self.send_json(
            Method::PUT,
            &format!("/api/admin/posts/{id}"),
            input,
            Some(token),
        )
        .await
    }

    pub(crate) async fn delete_post(&self, token: &str, id: i64) -> GameLogClientResult<String> {
        let dto: MessageDto = Self::execute(self.request(
            Method::DELETE,
            &format!("/api/admin/posts/{id}"),
            Some(token),
        ))
        .await?;
        Ok(dto.message)
    }

    pub(crate) async fn list_categories(&self) -> GameLogClientResult<Vec<CategorySummary>> {
        Self::execute(self.request(Method::GET, "/api/categories", None)).await
    }

    pub(crate) async fn create_category(
        &self,
        token: &str,
        name: &str,
    ) -> GameLogClientResult<Category> {
        self.send_json(
            Method::POST,
            "/api/admin/categories",
            &CategoryWriteDto { name },
            Some(token),
        )
        .await
    }

    pub(crate) async fn rename_category(
        &self,
        token: &str,
        id: i64,
        name: &str,
    ) -> GameLogClientResult<Category> {
        self.send_json(
            Method::PUT,
            &format!("/api/admin/categories/{id}"),
            &CategoryWriteDto { name },
            Some(token),
        )
        .await
    }

    pub(crate) async fn delete_category(
        &self,
        token: &str,
        id: i64,
    ) -> GameLogClientResult<String> {
        let dto: MessageDto = Self::execute(self.request(
            Method::DELETE,
            &format!("/api/admin/categories/{id}"),
            Some(token),
        ))
        .await?;
        Ok(dto.message)
    }

    pub(crate) async fn add_play_log(
        &self,
        token: &str,
        post_id: i64,
        content: &str,
    ) -> GameLogClientResult<PlayLog> {
        self.send_json(
            Method::POST,
            "/api/play-logs",
            &CreatePlayLogDto { post_id, content },
            Some(token),
        )
        .await
    }

    pub(crate) async fn stats(&self) -> GameLogClientResult<Stats> {
        Self::execute(self.request(Method::GET, "/api/stats", None)).await
    }
}
