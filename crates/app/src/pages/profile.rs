//! Profile page: locally stored activity plus derived statistics.

use crate::library::{HistoryEntry, SavedItem};
use crate::services::App;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ProfileStats {
    pub total_watched: usize,
    pub total_completed: usize,
    /// Seconds, summed over the history.
    pub total_watch_time: f64,
    /// "XhYmin"
    pub total_watch_time_formatted: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ProfilePage {
    pub history: Vec<HistoryEntry>,
    pub favorites: Vec<SavedItem>,
    pub watchlist: Vec<SavedItem>,
    pub stats: ProfileStats,
}

pub async fn load(app: &App) -> ProfilePage {
    let (history, favorites, watchlist) = tokio::join!(
        app.library.history(),
        app.library.favorites(),
        app.library.watchlist(),
    );

    let stats = stats_from(&history);
    ProfilePage {
        history,
        favorites,
        watchlist,
        stats,
    }
}

fn stats_from(history: &[HistoryEntry]) -> ProfileStats {
    let total_watch_time: f64 = history.iter().map(|h| h.watch_progress).sum();
    let hours = (total_watch_time / 3600.0).floor() as i64;
    let minutes = ((total_watch_time % 3600.0) / 60.0).floor() as i64;

    ProfileStats {
        total_watched: history.len(),
        total_completed: history.iter().filter(|h| h.completed).count(),
        total_watch_time,
        total_watch_time_formatted: format!("{hours}h {minutes}min"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_app;
    use std::sync::Arc;

    fn entry(episode_id: &str, watch_progress: f64, completed: bool) -> HistoryEntry {
        HistoryEntry {
            series_id: "c1".into(),
            series_title: "Le Voyage".into(),
            episode_id: episode_id.into(),
            episode_number: 1,
            season_number: 1,
            watch_progress,
            completed,
            timestamp: 0,
        }
    }

    #[test]
    fn stats_sum_and_format_watch_time() {
        let history = vec![
            entry("e1", 3600.0, true),
            entry("e2", 1500.0, false),
            entry("e3", 0.0, false),
        ];

        let stats = stats_from(&history);
        assert_eq!(stats.total_watched, 3);
        assert_eq!(stats.total_completed, 1);
        assert_eq!(stats.total_watch_time_formatted, "1h 25min");
    }

    #[test]
    fn empty_history_formats_as_zero() {
        let stats = stats_from(&[]);
        assert_eq!(stats.total_watch_time_formatted, "0h 0min");
    }

    #[tokio::test]
    async fn page_reads_every_list() {
        let app = test_app(Arc::new(crate::testutil::FakeContent::default())).await;
        app.library.add_to_history(entry("e1", 60.0, false)).await.unwrap();

        let page = load(&app).await;
        assert_eq!(page.history.len(), 1);
        assert!(page.favorites.is_empty());
        assert_eq!(page.stats.total_watched, 1);
    }
}
