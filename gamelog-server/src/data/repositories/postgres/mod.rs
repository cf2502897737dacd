pub(crate) mod category_repository;
pub(crate) mod play_log_repository;
pub(crate) mod post_repository;
pub(crate) mod user_repository;
