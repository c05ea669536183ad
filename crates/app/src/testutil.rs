//! Shared fixtures for page-controller tests: a canned content service and
//! an app wired to an in-memory SQLite store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cinetn_cache::{SqliteStore, TieredCache};
use cinetn_content::service::ContentService;
use cinetn_content::{
    ContentError, ContentFilters, ContentItem, Episode, EpisodeContext, PlayerLink, Season,
};
use cinetn_core::types::ContentKind;

use crate::library::Library;
use crate::services::App;

#[derive(Default)]
pub struct FakeContent {
    pub items: Vec<ContentItem>,
    pub seasons: HashMap<String, Vec<Season>>,
    pub episodes: HashMap<String, Vec<Episode>>,
    pub all_content_calls: AtomicUsize,
    pub content_by_id_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub views_bumped: AtomicUsize,
}

impl FakeContent {
    pub fn with_items(items: Vec<ContentItem>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn add_season(&mut self, series_id: &str, season_id: &str, season_number: i32) {
        self.seasons
            .entry(series_id.to_string())
            .or_default()
            .push(Season {
                id: season_id.to_string(),
                series_id: series_id.to_string(),
                season_number,
                display_name: None,
            });
        self.episodes.entry(season_id.to_string()).or_default();
    }

    pub fn add_episode(
        &mut self,
        season_id: &str,
        episode_id: &str,
        languages: &[(&str, usize)],
    ) {
        let episodes = self.episodes.entry(season_id.to_string()).or_default();
        let languages = languages
            .iter()
            .map(|&(tag, link_count)| {
                let links = (0..link_count)
                    .map(|i| PlayerLink {
                        server: Some(format!("Lecteur {}", i + 1)),
                        link: format!("https://v.example/{tag}/{i}"),
                    })
                    .collect();
                (tag.to_string(), links)
            })
            .collect();
        episodes.push(Episode {
            id: episode_id.to_string(),
            season_id: season_id.to_string(),
            episode_number: episodes.len() as i32 + 1,
            title: None,
            languages,
        });
    }
}

#[async_trait::async_trait]
impl ContentService for FakeContent {
    async fn all_content(
        &self,
        _filters: &ContentFilters,
    ) -> Result<Vec<ContentItem>, ContentError> {
        self.all_content_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.clone())
    }

    async fn content_by_id(&self, id: &str) -> Result<Option<ContentItem>, ContentError> {
        self.content_by_id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.iter().find(|item| item.id == id).cloned())
    }

    async fn seasons(&self, series_id: &str) -> Result<Vec<Season>, ContentError> {
        Ok(self.seasons.get(series_id).cloned().unwrap_or_default())
    }

    async fn episodes(&self, season_id: &str) -> Result<Vec<Episode>, ContentError> {
        Ok(self.episodes.get(season_id).cloned().unwrap_or_default())
    }

    async fn episode_context(
        &self,
        episode_id: &str,
    ) -> Result<Option<EpisodeContext>, ContentError> {
        let episode = self
            .episodes
            .values()
            .flatten()
            .find(|ep| ep.id == episode_id)
            .cloned();
        let Some(episode) = episode else {
            return Ok(None);
        };

        let season = self
            .seasons
            .values()
            .flatten()
            .find(|s| s.id == episode.season_id)
            .cloned();
        let Some(season) = season else {
            return Ok(None);
        };

        let series = self
            .items
            .iter()
            .find(|item| item.id == season.series_id)
            .cloned();
        let Some(series) = series else {
            return Ok(None);
        };

        Ok(Some(EpisodeContext {
            episode,
            season,
            series,
        }))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ContentItem>, ContentError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let needle = query.to_lowercase();
        Ok(self
            .items
            .iter()
            .filter(|item| item.title.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn increment_views(&self, _content_id: &str) -> Result<(), ContentError> {
        self.views_bumped.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn item(id: &str, title: &str, kind: ContentKind) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        title: title.to_string(),
        kind,
        year: None,
        rating: None,
        genres: Vec::new(),
        description: None,
        poster_url: None,
        backdrop_url: None,
        views: 0,
        created_at: None,
    }
}

pub async fn test_app(content: Arc<FakeContent>) -> App {
    let pool = cinetn_db::connect(":memory:").await.unwrap();
    cinetn_db::migrate::run(&pool).await.unwrap();
    let store = SqliteStore::new(pool);

    App {
        content,
        cache: TieredCache::new(store.clone()),
        library: Library::new(store),
    }
}
