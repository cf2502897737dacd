pub(crate) mod category;
pub(crate) mod error;
pub(crate) mod filter;
pub(crate) mod image_host;
pub(crate) mod play_log;
pub(crate) mod post;
pub(crate) mod stats;
pub(crate) mod user;
