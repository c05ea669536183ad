//! Environment-driven application configuration.

use cinetn_cache::store::DEFAULT_QUOTA_BYTES;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the hosted catalogue backend.
    pub api_base: String,
    /// Anonymous API key sent with every request.
    pub api_key: String,
    /// Path of the local SQLite file backing the persisted cache tier and
    /// the viewer library.
    pub db_path: String,
    /// Persisted-tier quota in bytes.
    pub quota_bytes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_base = std::env::var("CINETN_API_BASE")
            .unwrap_or_else(|_| "http://localhost:54321".to_string());
        let api_key = std::env::var("CINETN_API_KEY").unwrap_or_default();
        let db_path = std::env::var("CINETN_DB").unwrap_or_else(|_| "cinetn.db".to_string());
        let quota_bytes = std::env::var("CINETN_QUOTA_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_QUOTA_BYTES);

        Self {
            api_base,
            api_key,
            db_path,
            quota_bytes,
        }
    }
}
