use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by `gamelog-client`.
pub enum GameLogClientError {
    /// Transport failure or an undecodable response (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing, invalid or expired token, or wrong credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The server refused the operation, e.g. registration is disabled.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The requested post, category or related id does not exist.
    #[error("not found")]
    NotFound,

    /// A unique value (email, category name) is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The server rejected the payload or query.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The server failed while handling the request.
    #[error("server error: {0}")]
    Server(String),
}

/// Result of `gamelog-client` operations.
pub type GameLogClientResult<T> = Result<T, GameLogClientError>;

impl GameLogClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized,
            reqwest::StatusCode::FORBIDDEN => Self::Forbidden(message),
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            reqwest::StatusCode::CONFLICT => Self::Conflict(message),
            status if status.is_server_error() => Self::Server(message),
            _ => Self::InvalidRequest(message),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}
