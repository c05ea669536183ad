//! Page controllers: each builds a DOM-free view model from the injected
//! services. Rendering (HTML, terminal, anything) happens elsewhere.

pub mod catalogue;
pub mod details;
pub mod home;
pub mod profile;
pub mod search;
pub mod watch;

use std::collections::{HashMap, HashSet};

use cinetn_content::{ContentFilters, ContentItem};
use cinetn_core::types::CacheCategory;
use tracing::warn;

use crate::services::App;

/// A catalogue card decorated with its live language badges.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Card {
    pub item: ContentItem,
    /// Sorted for stable display.
    pub languages: Vec<String>,
}

fn decorate(
    items: Vec<ContentItem>,
    languages: &HashMap<String, HashSet<String>>,
) -> Vec<Card> {
    items
        .into_iter()
        .map(|item| {
            let mut tags: Vec<String> = languages
                .get(&item.id)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default();
            tags.sort();
            Card {
                item,
                languages: tags,
            }
        })
        .collect()
}

/// Read-through catalogue snapshot: cache first, fetch and fill on a miss.
/// A failed fetch renders as an empty listing, never an error.
async fn cached_all_content(app: &App, cache_key: &str) -> Vec<ContentItem> {
    if let Some(value) = app.cache.get(cache_key, CacheCategory::Catalogue).await {
        match serde_json::from_value(value) {
            Ok(items) => return items,
            Err(e) => warn!(cache_key, error = %e, "discarding mistyped cache entry"),
        }
    }

    match app.content.all_content(&ContentFilters::default()).await {
        Ok(items) => {
            match serde_json::to_value(&items) {
                Ok(value) => app.cache.set(cache_key, value, CacheCategory::Catalogue).await,
                Err(e) => warn!(cache_key, error = %e, "uncacheable catalogue snapshot"),
            }
            items
        }
        Err(e) => {
            warn!(error = %e, "catalogue fetch failed");
            Vec::new()
        }
    }
}
