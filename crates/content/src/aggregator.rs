//! Live language availability over the season/episode hierarchy.
//!
//! Computed fresh on every call and never cached: links are edited often by
//! administrators, and a stale union would show the wrong badges.

use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use tracing::warn;

use crate::service::ContentService;

/// Distinct version tags with at least one playable link somewhere in the
/// series. A tag whose link list is empty contributes nothing. Any fetch
/// failure degrades to whatever the surviving seasons yielded; the result
/// is never an error.
pub async fn available_languages(
    service: &dyn ContentService,
    series_id: &str,
) -> HashSet<String> {
    let seasons = match service.seasons(series_id).await {
        Ok(seasons) => seasons,
        Err(e) => {
            warn!(series_id, error = %e, "season fetch failed");
            return HashSet::new();
        }
    };

    let fetches = seasons.iter().map(|season| service.episodes(&season.id));
    let mut languages = HashSet::new();

    for (season, episodes) in seasons.iter().zip(join_all(fetches).await) {
        let episodes = match episodes {
            Ok(episodes) => episodes,
            Err(e) => {
                warn!(series_id, season_id = %season.id, error = %e, "episode fetch failed");
                continue;
            }
        };

        for episode in episodes {
            for (tag, links) in &episode.languages {
                if !links.is_empty() {
                    languages.insert(tag.clone());
                }
            }
        }
    }

    languages
}

/// Language sets for a whole listing, one aggregation per item, all items
/// in flight together. Listing latency is bounded by the slowest single
/// item, not the sum.
pub async fn available_languages_all(
    service: &dyn ContentService,
    ids: &[String],
) -> HashMap<String, HashSet<String>> {
    let fetches = ids
        .iter()
        .map(|id| async move { (id.clone(), available_languages(service, id).await) });

    join_all(fetches).await.into_iter().collect()
}
