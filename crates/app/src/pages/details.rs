//! Details page: one title with its seasons, languages, and similar titles.

use cinetn_content::service::ContentService;
use cinetn_content::{ContentFilters, ContentItem, Season, aggregator};
use cinetn_core::types::CacheCategory;
use tracing::warn;

use crate::services::App;

/// How many candidates the similarity pass considers.
const SIMILAR_POOL: usize = 100;
const SIMILAR_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DetailsPage {
    pub item: ContentItem,
    pub seasons: Vec<Season>,
    /// Sorted for stable display.
    pub languages: Vec<String>,
    pub similar: Vec<ContentItem>,
}

/// `None` when the title does not exist or cannot be fetched.
pub async fn load(app: &App, series_id: &str) -> Option<DetailsPage> {
    let item = cached_item(app, series_id).await?;

    let (seasons, languages, similar) = tokio::join!(
        fetch_seasons(app, series_id),
        aggregator::available_languages(app.content.as_ref(), series_id),
        similar_content(app.content.as_ref(), &item),
    );

    let mut languages: Vec<String> = languages.into_iter().collect();
    languages.sort();

    Some(DetailsPage {
        item,
        seasons,
        languages,
        similar,
    })
}

async fn fetch_seasons(app: &App, series_id: &str) -> Vec<Season> {
    match app.content.seasons(series_id).await {
        Ok(seasons) => seasons,
        Err(e) => {
            warn!(series_id, error = %e, "season fetch failed");
            Vec::new()
        }
    }
}

async fn cached_item(app: &App, series_id: &str) -> Option<ContentItem> {
    let cache_key = format!("details_{series_id}");
    if let Some(value) = app.cache.get(&cache_key, CacheCategory::Details).await {
        match serde_json::from_value(value) {
            Ok(item) => return Some(item),
            Err(e) => warn!(series_id, error = %e, "discarding mistyped cache entry"),
        }
    }

    match app.content.content_by_id(series_id).await {
        Ok(Some(item)) => {
            if let Ok(value) = serde_json::to_value(&item) {
                app.cache.set(&cache_key, value, CacheCategory::Details).await;
            }
            Some(item)
        }
        Ok(None) => None,
        Err(e) => {
            warn!(series_id, error = %e, "details fetch failed");
            None
        }
    }
}

/// Titles sharing at least one genre, the item itself excluded. A title
/// without genres falls back to the first few others.
async fn similar_content(service: &dyn ContentService, item: &ContentItem) -> Vec<ContentItem> {
    let pool = match service.all_content(&ContentFilters::default()).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "similar content fetch failed");
            return Vec::new();
        }
    };

    let others = pool
        .into_iter()
        .filter(|c| c.id != item.id)
        .take(SIMILAR_POOL);

    if item.genres.is_empty() {
        return others.take(SIMILAR_LEN).collect();
    }

    others
        .filter(|c| c.genres.iter().any(|g| item.genres.contains(g)))
        .take(SIMILAR_LEN)
        .collect()
}
