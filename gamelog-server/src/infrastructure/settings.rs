use anyhow::{Context, Result, anyhow};

/// Cover art hosts accepted when `IMAGE_HOST_ALLOWLIST` is not set.
const DEFAULT_IMAGE_HOSTS: &str = "w1980.blob.core.windows.net,placehold.jp,\
images.microcms-assets.io,**.supabase.co,upload.wikimedia.org";

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) database_url: String,
    pub(crate) database_max_connections: u32,
    pub(crate) jwt_secret: String,
    pub(crate) jwt_ttl_seconds: i64,
    pub(crate) http_addr: String,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) log_level: String,
    pub(crate) http_request_body_limit_bytes: usize,
    pub(crate) http_concurrency_limit: usize,
    pub(crate) http_request_timeout_secs: u64,
    pub(crate) image_host_allowlist: Vec<String>,
    pub(crate) registration_enabled: bool,
    pub(crate) seed_demo_data: bool,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;
        let jwt_secret = get_required("JWT_SECRET").context("JWT_SECRET is required")?;
        let jwt_ttl_seconds: i64 = std::env::var("JWT_TTL_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .context("Failed to parse JWT_TTL_SECONDS, expecting integer")?;

        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }

        let database_max_connections =
            u32::try_from(parse_usize_env("DATABASE_MAX_CONNECTIONS", 10)?)
                .context("DATABASE_MAX_CONNECTIONS is too large")?;
        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_origins = parse_list(
            &std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_concurrency_limit = parse_usize_env("HTTP_CONCURRENCY_LIMIT", 256)?;
        let http_request_timeout_secs = parse_u64_env("HTTP_REQUEST_TIMEOUT_SECS", 10)?;
        let image_host_allowlist = parse_list(
            &std::env::var("IMAGE_HOST_ALLOWLIST")
                .unwrap_or_else(|_| DEFAULT_IMAGE_HOSTS.to_string()),
        );
        let registration_enabled = parse_bool_env("REGISTRATION_ENABLED", true)?;
        let seed_demo_data = parse_bool_env("SEED_DEMO_DATA", false)?;

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_ttl_seconds,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
            image_host_allowlist,
            registration_enabled,
            seed_demo_data,
        })
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_bool_env(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(raw) => {
            parse_bool(&raw).with_context(|| format!("Failed to parse {key}, expecting bool"))
        }
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("unexpected value '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_IMAGE_HOSTS, parse_bool, parse_list};

    #[test]
    fn parse_list_skips_blank_entries() {
        let list = parse_list(" http://a.test , ,http://b.test,");
        assert_eq!(list, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn default_image_hosts_cover_known_cdns() {
        let hosts = parse_list(DEFAULT_IMAGE_HOSTS);
        assert_eq!(hosts.len(), 5);
        assert!(hosts.iter().any(|host| host == "**.supabase.co"));
        assert!(hosts.iter().any(|host| host == "placehold.jp"));
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool(" TRUE ").expect("valid"));
        assert!(parse_bool("on").expect("valid"));
        assert!(!parse_bool("0").expect("valid"));
        assert!(parse_bool("maybe").is_err());
    }
}
