use serde::Serialize;
use utoipa::ToSchema;

pub(crate) mod auth;
pub(crate) mod categories;
pub(crate) mod play_logs;
pub(crate) mod posts;
pub(crate) mod stats;

/// Acknowledgement returned by delete endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct MessageDto {
    pub(crate) message: String,
}

impl MessageDto {
    pub(crate) fn deleted(name: &str) -> Self {
        Self {
            message: format!("deleted \"{name}\""),
        }
    }
}
