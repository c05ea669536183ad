//! Two-tier read-through cache for catalogue query results.
//!
//! Tier 1 is a process-local map, consulted first and authoritative within a
//! session. Tier 2 is a durable [`KeyValueStore`] that carries entries across
//! restarts. Freshness is per [`CacheCategory`]; expiry is checked lazily at
//! read time. Persisted-tier failures are never fatal: reads degrade to a
//! miss, writes are dropped after one evict-and-retry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use cinetn_core::types::CacheCategory;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::store::{KeyValueStore, StoreError};

/// Namespace prefix for persisted entries. `clear` and the eviction sweep
/// only ever touch keys carrying it.
pub const STORAGE_PREFIX: &str = "cinetn_cache_";

const MINUTE_MS: i64 = 60 * 1000;

/// Freshness window per category, in milliseconds.
fn ttl_millis(category: CacheCategory) -> i64 {
    match category {
        CacheCategory::Catalogue => 5 * MINUTE_MS,
        CacheCategory::Details => 60 * MINUTE_MS,
        CacheCategory::Genres => 24 * 60 * MINUTE_MS,
        CacheCategory::Search => 2 * MINUTE_MS,
    }
}

/// Valid while `now - timestamp <= TTL`, expired strictly after.
fn is_expired(timestamp: i64, category: CacheCategory, now: i64) -> bool {
    now - timestamp > ttl_millis(category)
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn storage_key(key: &str) -> String {
    format!("{STORAGE_PREFIX}{key}")
}

/// One cached value. Immutable once stored; `set` replaces.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct CacheEntry {
    data: Value,
    /// Creation instant, epoch milliseconds.
    timestamp: i64,
    /// Kept as a raw tag so entries written under a tag this build no longer
    /// knows still deserialize.
    category: String,
}

/// Entry counts per tier. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub storage_entries: usize,
    pub total_entries: usize,
}

pub struct TieredCache<S> {
    memory: Mutex<HashMap<String, CacheEntry>>,
    store: S,
}

impl<S: KeyValueStore> TieredCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            memory: Mutex::new(HashMap::new()),
            store,
        }
    }

    fn memory(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // Tier-1 ops never hold the lock across an await; a poisoned lock
        // only means a panic mid-read, so the map is still usable.
        self.memory.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Look up a fresh entry, local tier first. A persisted hit is promoted
    /// into the local tier; an expired persisted entry is deleted. A clean
    /// miss has no side effect.
    pub async fn get(&self, key: &str, category: CacheCategory) -> Option<Value> {
        self.get_at(key, category, now_millis()).await
    }

    async fn get_at(&self, key: &str, category: CacheCategory, now: i64) -> Option<Value> {
        if key.is_empty() {
            return None;
        }

        {
            let memory = self.memory();
            if let Some(entry) = memory.get(key) {
                if !is_expired(entry.timestamp, category, now) {
                    debug!(key, "cache hit (memory)");
                    return Some(entry.data.clone());
                }
            }
        }

        let storage_key = storage_key(key);
        match self.store.get(&storage_key).await {
            Ok(Some(raw)) => match serde_json::from_str::<CacheEntry>(&raw) {
                Ok(entry) if !is_expired(entry.timestamp, category, now) => {
                    debug!(key, "cache hit (storage)");
                    let data = entry.data.clone();
                    // Promote with the original creation time so later
                    // local-tier freshness checks stay relative to the
                    // first write.
                    self.memory().insert(key.to_string(), entry);
                    Some(data)
                }
                Ok(_) => {
                    if let Err(e) = self.store.remove(&storage_key).await {
                        warn!(key, error = %e, "failed to drop expired cache entry");
                    }
                    debug!(key, "cache miss");
                    None
                }
                Err(e) => {
                    // Left in place; the eviction sweep reclaims it first.
                    warn!(key, error = %e, "unreadable cache entry");
                    None
                }
            },
            Ok(None) => {
                debug!(key, "cache miss");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "cache read error");
                None
            }
        }
    }

    /// Store a value in both tiers, timestamped now. A persisted write
    /// refused for quota triggers one eviction sweep and one retry; a second
    /// refusal drops the persisted copy (the local tier keeps serving it for
    /// the rest of the session).
    pub async fn set(&self, key: &str, value: Value, category: CacheCategory) {
        self.set_at(key, value, category, now_millis()).await
    }

    async fn set_at(&self, key: &str, value: Value, category: CacheCategory, now: i64) {
        if key.is_empty() {
            return;
        }

        let entry = CacheEntry {
            data: value,
            timestamp: now,
            category: category.as_str().to_string(),
        };
        self.memory().insert(key.to_string(), entry.clone());

        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "unserializable cache entry");
                return;
            }
        };

        let storage_key = storage_key(key);
        match self.store.set(&storage_key, &raw).await {
            Ok(()) => debug!(key, category = %category, "cached"),
            Err(StoreError::QuotaExceeded) => {
                warn!(key, "storage quota exceeded, evicting oldest entries");
                self.evict_oldest().await;
                if let Err(e) = self.store.set(&storage_key, &raw).await {
                    warn!(key, error = %e, "dropping persisted write after eviction");
                }
            }
            Err(e) => warn!(key, error = %e, "cache write error"),
        }
    }

    /// Empty the local tier and remove every persisted entry under the cache
    /// namespace. Unrelated persisted keys are never touched. Idempotent.
    pub async fn clear(&self) {
        self.memory().clear();

        match self.store.list_keys().await {
            Ok(keys) => {
                for key in keys.into_iter().filter(|k| k.starts_with(STORAGE_PREFIX)) {
                    if let Err(e) = self.store.remove(&key).await {
                        warn!(key = %key, error = %e, "failed to remove cache entry");
                    }
                }
                debug!("cache cleared");
            }
            Err(e) => warn!(error = %e, "cache clear error"),
        }
    }

    /// Remove the oldest half (rounded up) of the persisted entries.
    /// Unparsable entries sort as timestamp zero and go first, which
    /// reclaims corrupted payloads before anything else.
    pub async fn evict_oldest(&self) {
        let keys = match self.store.list_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "eviction sweep aborted");
                return;
            }
        };

        let mut entries: Vec<(String, i64)> = Vec::new();
        for key in keys.into_iter().filter(|k| k.starts_with(STORAGE_PREFIX)) {
            let timestamp = match self.store.get(&key).await {
                Ok(Some(raw)) => serde_json::from_str::<CacheEntry>(&raw)
                    .map(|e| e.timestamp)
                    .unwrap_or(0),
                _ => 0,
            };
            entries.push((key, timestamp));
        }

        entries.sort_by_key(|&(_, timestamp)| timestamp);

        let to_remove = entries.len().div_ceil(2);
        for (key, _) in entries.iter().take(to_remove) {
            if let Err(e) = self.store.remove(key).await {
                warn!(key = %key, error = %e, "failed to evict cache entry");
            }
        }

        info!(removed = to_remove, "evicted oldest cache entries");
    }

    /// Entry counts per tier. Never fails; store errors count as zero.
    pub async fn stats(&self) -> CacheStats {
        let memory_entries = self.memory().len();

        let storage_entries = match self.store.list_keys().await {
            Ok(keys) => keys
                .iter()
                .filter(|k| k.starts_with(STORAGE_PREFIX))
                .count(),
            Err(e) => {
                warn!(error = %e, "cache stats error");
                0
            }
        };

        CacheStats {
            memory_entries,
            storage_entries,
            total_entries: memory_entries + storage_entries,
        }
    }
}
