//! Live search with short-query suppression and a bounded result list.

use cinetn_content::ContentItem;
use cinetn_core::MIN_SEARCH_QUERY_LEN;
use cinetn_core::types::CacheCategory;
use tracing::warn;

use crate::services::App;

pub const SEARCH_RESULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SearchPage {
    pub query: String,
    pub results: Vec<ContentItem>,
}

/// Queries shorter than the minimum (after trimming) never reach the
/// backend. Hits are cached briefly under the search category so repeated
/// keystrokes resolving to the same query stay local.
pub async fn run(app: &App, query: &str) -> SearchPage {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_SEARCH_QUERY_LEN {
        return SearchPage {
            query: trimmed.to_string(),
            results: Vec::new(),
        };
    }

    let cache_key = format!("search_{}", trimmed.to_lowercase());
    if let Some(value) = app.cache.get(&cache_key, CacheCategory::Search).await {
        match serde_json::from_value(value) {
            Ok(results) => {
                return SearchPage {
                    query: trimmed.to_string(),
                    results,
                };
            }
            Err(e) => warn!(cache_key = %cache_key, error = %e, "discarding mistyped cache entry"),
        }
    }

    let results = match app.content.search(trimmed, SEARCH_RESULT_LIMIT).await {
        Ok(results) => {
            if let Ok(value) = serde_json::to_value(&results) {
                app.cache.set(&cache_key, value, CacheCategory::Search).await;
            }
            results
        }
        Err(e) => {
            warn!(query = trimmed, error = %e, "search failed");
            Vec::new()
        }
    };

    SearchPage {
        query: trimmed.to_string(),
        results,
    }
}
