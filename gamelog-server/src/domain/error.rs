use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl DomainError {
    pub(crate) fn validation(field: &'static str, message: &'static str) -> Self {
        Self::Validation { field, message }
    }
}
