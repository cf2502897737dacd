pub(crate) mod database;
pub(crate) mod jwt;
pub(crate) mod logging;
pub(crate) mod seed;
pub(crate) mod settings;
