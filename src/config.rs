//! config.rs — environment-driven settings with sane defaults.
//!
//! Everything is optional: with nothing set, the service boots against the
//! public registry endpoint with an empty key, upstream calls fail, and every
//! response degrades to the sample datasets. `.env` is loaded by the binary
//! entrypoint before this runs.

pub const ENV_REGISTRY_BASE_URL: &str = "REGISTRY_BASE_URL";
pub const ENV_REGISTRY_API_KEY: &str = "REGISTRY_API_KEY";
pub const ENV_NEWS_BASE_URL: &str = "NEWS_BASE_URL";
pub const ENV_NEWS_API_KEY: &str = "NEWS_API_KEY";
pub const ENV_PRICE_CACHE_SECS: &str = "PRICE_CACHE_SECS";
pub const ENV_NEWS_CACHE_SECS: &str = "NEWS_CACHE_SECS";
pub const ENV_PRICE_LIMIT: &str = "PRICE_LIMIT";
pub const ENV_NEWS_LIMIT: &str = "NEWS_LIMIT";

pub const DEFAULT_REGISTRY_BASE_URL: &str =
    "https://api.data.gov.in/resource/9ef84268-d588-465a-a308-a864a43d0070";
pub const DEFAULT_NEWS_BASE_URL: &str = "https://newsapi.org/v2/everything";

/// Price quotes go stale quickly; news keeps for half an hour.
pub const DEFAULT_PRICE_CACHE_SECS: i64 = 300;
pub const DEFAULT_NEWS_CACHE_SECS: i64 = 1800;

pub const DEFAULT_PRICE_LIMIT: usize = 35;
pub const DEFAULT_NEWS_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub registry_base_url: String,
    pub registry_api_key: String,
    pub news_base_url: String,
    pub news_api_key: String,
    pub price_cache_secs: i64,
    pub news_cache_secs: i64,
    pub price_limit: usize,
    pub news_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            registry_base_url: env_or(ENV_REGISTRY_BASE_URL, DEFAULT_REGISTRY_BASE_URL),
            registry_api_key: env_or(ENV_REGISTRY_API_KEY, ""),
            news_base_url: env_or(ENV_NEWS_BASE_URL, DEFAULT_NEWS_BASE_URL),
            news_api_key: env_or(ENV_NEWS_API_KEY, ""),
            price_cache_secs: env_parsed(ENV_PRICE_CACHE_SECS, DEFAULT_PRICE_CACHE_SECS),
            news_cache_secs: env_parsed(ENV_NEWS_CACHE_SECS, DEFAULT_NEWS_CACHE_SECS),
            price_limit: env_parsed(ENV_PRICE_LIMIT, DEFAULT_PRICE_LIMIT),
            news_limit: env_parsed(ENV_NEWS_LIMIT, DEFAULT_NEWS_LIMIT),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Parse an env var, falling back to the default on absence or garbage.
fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
