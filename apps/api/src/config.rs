use anyhow::{Context, Result};

/// Upstream analysis backend used when neither `BACKEND_URL` nor
/// `FASTAPI_BACKEND_URL` is set.
pub const DEFAULT_BACKEND_URL: &str = "https://generativeai-production.up.railway.app";

/// Application configuration loaded from environment variables.
/// Resolved once at startup and handed to the clients that need it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream analysis service, without a trailing slash.
    pub backend_url: String,
    /// PostgreSQL connection string. `None` keeps records in memory.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound for a full analysis round trip to the upstream service.
    pub upstream_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend_url = optional_env("BACKEND_URL")
            .or_else(|| optional_env("FASTAPI_BACKEND_URL"))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        Ok(Config {
            backend_url: normalize_base_url(&backend_url),
            database_url: optional_env("DATABASE_URL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            upstream_timeout_secs: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse::<u64>()
                .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
        })
    }

    /// Joins an upstream path (with or without a leading slash) onto the backend base URL.
    pub fn backend_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.backend_url, path.trim_start_matches('/'))
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
impl Config {
    /// Config pointing at a local fake upstream, with no database.
    pub fn for_backend(backend_url: &str) -> Self {
        Config {
            backend_url: normalize_base_url(backend_url),
            database_url: None,
            port: 0,
            rust_log: "debug".to_string(),
            upstream_timeout_secs: 5,
        }
    }
}
