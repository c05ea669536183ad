//! Locally persisted viewer data: watch history, favorites, watchlist.
//!
//! Lists live next to the cache namespace in the same key/value store but
//! under their own keys, so cache clears and evictions never touch them.
//! Reads degrade to empty lists; writes surface [`StoreError`] so callers
//! can decide whether the failure matters.

use cinetn_cache::{KeyValueStore, StoreError};
use cinetn_core::MAX_HISTORY_ITEMS;
use cinetn_core::types::ContentKind;
use serde::de::DeserializeOwned;
use tracing::warn;

const HISTORY_KEY: &str = "cinetn_history";
const FAVORITES_KEY: &str = "cinetn_favorites";
const WATCHLIST_KEY: &str = "cinetn_watchlist";
const USER_ID_KEY: &str = "cinetn_user_id";

/// One watched episode, most recent first in the stored list.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    pub series_id: String,
    pub series_title: String,
    pub episode_id: String,
    pub episode_number: i32,
    pub season_number: i32,
    /// Seconds watched so far.
    pub watch_progress: f64,
    pub completed: bool,
    /// Set by [`Library::add_to_history`], epoch milliseconds.
    pub timestamp: i64,
}

/// A title saved to favorites or the watchlist.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SavedItem {
    pub id: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub kind: ContentKind,
    /// Epoch milliseconds.
    pub added_at: i64,
}

pub struct Library<S> {
    store: S,
}

impl<S: KeyValueStore> Library<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.store.get(key).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(key, error = %e, "unreadable library list");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "library read error");
                Vec::new()
            }
        }
    }

    async fn write_list<T: serde::Serialize>(
        &self,
        key: &str,
        list: &[T],
    ) -> Result<(), StoreError> {
        let raw =
            serde_json::to_string(list).map_err(|e| StoreError::Backend(e.to_string()))?;
        self.store.set(key, &raw).await
    }

    /// Record a watch event. Re-watching an episode moves its entry to the
    /// front; the list is capped at the most recent entries.
    pub async fn add_to_history(&self, mut entry: HistoryEntry) -> Result<(), StoreError> {
        entry.timestamp = now_millis();

        let mut history: Vec<HistoryEntry> = self.read_list(HISTORY_KEY).await;
        history.retain(|h| h.episode_id != entry.episode_id);
        history.insert(0, entry);
        history.truncate(MAX_HISTORY_ITEMS);

        self.write_list(HISTORY_KEY, &history).await
    }

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.read_list(HISTORY_KEY).await
    }

    pub async fn remove_from_history(&self, episode_id: &str) -> Result<(), StoreError> {
        let mut history: Vec<HistoryEntry> = self.read_list(HISTORY_KEY).await;
        history.retain(|h| h.episode_id != episode_id);
        self.write_list(HISTORY_KEY, &history).await
    }

    pub async fn clear_history(&self) -> Result<(), StoreError> {
        self.store.remove(HISTORY_KEY).await
    }

    /// Returns `false` when the title is already saved.
    pub async fn add_to_favorites(&self, item: SavedItem) -> Result<bool, StoreError> {
        self.add_saved(FAVORITES_KEY, item).await
    }

    pub async fn favorites(&self) -> Vec<SavedItem> {
        self.read_list(FAVORITES_KEY).await
    }

    pub async fn remove_from_favorites(&self, id: &str) -> Result<(), StoreError> {
        self.remove_saved(FAVORITES_KEY, id).await
    }

    pub async fn is_favorite(&self, id: &str) -> bool {
        self.favorites().await.iter().any(|f| f.id == id)
    }

    /// Returns `false` when the title is already saved.
    pub async fn add_to_watchlist(&self, item: SavedItem) -> Result<bool, StoreError> {
        self.add_saved(WATCHLIST_KEY, item).await
    }

    pub async fn watchlist(&self) -> Vec<SavedItem> {
        self.read_list(WATCHLIST_KEY).await
    }

    pub async fn remove_from_watchlist(&self, id: &str) -> Result<(), StoreError> {
        self.remove_saved(WATCHLIST_KEY, id).await
    }

    pub async fn is_in_watchlist(&self, id: &str) -> bool {
        self.watchlist().await.iter().any(|w| w.id == id)
    }

    async fn add_saved(&self, key: &str, mut item: SavedItem) -> Result<bool, StoreError> {
        let mut saved: Vec<SavedItem> = self.read_list(key).await;
        if saved.iter().any(|s| s.id == item.id) {
            return Ok(false);
        }

        item.added_at = now_millis();
        saved.insert(0, item);
        self.write_list(key, &saved).await?;
        Ok(true)
    }

    async fn remove_saved(&self, key: &str, id: &str) -> Result<(), StoreError> {
        let mut saved: Vec<SavedItem> = self.read_list(key).await;
        saved.retain(|s| s.id != id);
        self.write_list(key, &saved).await
    }

    /// Stable per-installation visitor id, generated on first use.
    pub async fn user_id(&self) -> Result<String, StoreError> {
        if let Some(id) = self.store.get(USER_ID_KEY).await? {
            if !id.is_empty() {
                return Ok(id);
            }
        }

        let id = format!("user_{}", uuid::Uuid::new_v4());
        self.store.set(USER_ID_KEY, &id).await?;
        Ok(id)
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinetn_cache::SqliteStore;

    async fn test_library() -> Library<SqliteStore> {
        let pool = cinetn_db::connect(":memory:").await.unwrap();
        cinetn_db::migrate::run(&pool).await.unwrap();
        Library::new(SqliteStore::new(pool))
    }

    fn history_entry(episode_id: &str) -> HistoryEntry {
        HistoryEntry {
            series_id: "c1".into(),
            series_title: "Le Voyage".into(),
            episode_id: episode_id.into(),
            episode_number: 1,
            season_number: 1,
            watch_progress: 0.0,
            completed: false,
            timestamp: 0,
        }
    }

    fn saved(id: &str) -> SavedItem {
        SavedItem {
            id: id.into(),
            title: format!("Titre {id}"),
            poster_url: None,
            kind: ContentKind::Serie,
            added_at: 0,
        }
    }

    #[tokio::test]
    async fn rewatching_moves_the_entry_to_the_front() {
        let library = test_library().await;

        library.add_to_history(history_entry("e1")).await.unwrap();
        library.add_to_history(history_entry("e2")).await.unwrap();
        library.add_to_history(history_entry("e1")).await.unwrap();

        let ids: Vec<String> = library
            .history()
            .await
            .into_iter()
            .map(|h| h.episode_id)
            .collect();
        assert_eq!(ids, vec!["e1", "e2"]);
    }

    #[tokio::test]
    async fn history_is_capped() {
        let library = test_library().await;

        for i in 0..(MAX_HISTORY_ITEMS + 5) {
            library
                .add_to_history(history_entry(&format!("e{i}")))
                .await
                .unwrap();
        }

        let history = library.history().await;
        assert_eq!(history.len(), MAX_HISTORY_ITEMS);
        // The oldest entries fell off
        assert_eq!(history.last().unwrap().episode_id, "e5");
    }

    #[tokio::test]
    async fn remove_and_clear_history() {
        let library = test_library().await;
        library.add_to_history(history_entry("e1")).await.unwrap();
        library.add_to_history(history_entry("e2")).await.unwrap();

        library.remove_from_history("e1").await.unwrap();
        assert_eq!(library.history().await.len(), 1);

        library.clear_history().await.unwrap();
        assert!(library.history().await.is_empty());
        // Clearing twice is fine
        library.clear_history().await.unwrap();
    }

    #[tokio::test]
    async fn favorites_reject_duplicates() {
        let library = test_library().await;

        assert!(library.add_to_favorites(saved("c1")).await.unwrap());
        assert!(!library.add_to_favorites(saved("c1")).await.unwrap());
        assert!(library.is_favorite("c1").await);
        assert!(!library.is_favorite("c2").await);

        library.remove_from_favorites("c1").await.unwrap();
        assert!(!library.is_favorite("c1").await);
    }

    #[tokio::test]
    async fn watchlist_is_independent_of_favorites() {
        let library = test_library().await;

        library.add_to_favorites(saved("c1")).await.unwrap();
        assert!(!library.is_in_watchlist("c1").await);

        library.add_to_watchlist(saved("c2")).await.unwrap();
        assert_eq!(library.watchlist().await[0].id, "c2");
        library.remove_from_watchlist("c2").await.unwrap();
        assert!(library.watchlist().await.is_empty());
    }

    #[tokio::test]
    async fn user_id_is_generated_once() {
        let library = test_library().await;

        let first = library.user_id().await.unwrap();
        assert!(first.starts_with("user_"));
        assert_eq!(library.user_id().await.unwrap(), first);
    }

    #[tokio::test]
    async fn corrupt_lists_read_as_empty() {
        let library = test_library().await;
        library.store.set(HISTORY_KEY, "{not json").await.unwrap();

        assert!(library.history().await.is_empty());
    }
}
