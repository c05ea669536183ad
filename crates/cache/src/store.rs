//! Persisted cache tier: a durable string key/value store.

use sqlx::SqlitePool;
use thiserror::Error;

/// Default persisted-tier quota.
pub const DEFAULT_QUOTA_BYTES: i64 = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

/// A string key/value store that survives restarts.
///
/// Writes may be refused with [`StoreError::QuotaExceeded`] when the backing
/// storage is full; the cache reacts by evicting and retrying once.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
    async fn list_keys(&self) -> Result<Vec<String>, StoreError>;
}

#[async_trait::async_trait]
impl<T: KeyValueStore> KeyValueStore for &T {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key).await
    }

    async fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).list_keys().await
    }
}

/// SQLite-backed store enforcing a byte quota over keys plus values.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    quota_bytes: i64,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_quota(pool, DEFAULT_QUOTA_BYTES)
    }

    pub fn with_quota(pool: SqlitePool, quota_bytes: i64) -> Self {
        Self { pool, quota_bytes }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(cinetn_db::kv::get(&self.pool, key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let incoming = (key.len() + value.len()) as i64;
        let usage = cinetn_db::kv::usage_bytes(&self.pool).await?;
        // Replacing a key frees its current bytes first.
        let replaced = cinetn_db::kv::entry_bytes(&self.pool, key)
            .await?
            .unwrap_or(0);

        if usage - replaced + incoming > self.quota_bytes {
            return Err(StoreError::QuotaExceeded);
        }

        Ok(cinetn_db::kv::set(&self.pool, key, value).await?)
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        cinetn_db::kv::delete(&self.pool, key).await?;
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(cinetn_db::kv::list_keys(&self.pool).await?)
    }
}
