//! Watch page: player and language selection plus episode navigation.

use std::sync::LazyLock;

use cinetn_content::{ContentItem, Episode};
use cinetn_core::languages::language_info;
use regex::Regex;
use tracing::warn;

use crate::library::HistoryEntry;
use crate::services::App;

/// Tag tried first when the viewer has not picked one yet.
pub const DEFAULT_LANGUAGE: &str = "VF";

/// Players without a number in their label sort after every numbered one.
const UNNUMBERED_RANK: u32 = 999;

static RE_SERVER_NUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// One selectable version tag with its registered display name.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LanguageOption {
    pub tag: String,
    pub name: String,
}

/// One selectable player, in display order.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PlayerOption {
    /// Index into the episode's original link list.
    pub index: usize,
    pub label: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WatchPage {
    pub series: ContentItem,
    pub season_label: String,
    pub episode: Episode,
    /// "Saison X - Épisode N"
    pub episode_title: String,
    /// Every episode of the same season, for the selector.
    pub siblings: Vec<Episode>,
    /// Every tag the episode carries, sorted, with display names.
    pub language_options: Vec<LanguageOption>,
    /// `None` when the episode has no languages at all.
    pub selected_language: Option<String>,
    /// Players for the selected language, sorted by server number.
    pub players: Vec<PlayerOption>,
    pub prev_episode_id: Option<String>,
    pub next_episode_id: Option<String>,
    pub last_episode_id: Option<String>,
}

/// `None` when the episode does not exist or cannot be fetched. Loading a
/// page records the visit in the local history and bumps the series view
/// counter; neither bookkeeping failure blocks playback.
pub async fn load(app: &App, episode_id: &str, requested_language: &str) -> Option<WatchPage> {
    let ctx = match app.content.episode_context(episode_id).await {
        Ok(Some(ctx)) => ctx,
        Ok(None) => return None,
        Err(e) => {
            warn!(episode_id, error = %e, "episode fetch failed");
            return None;
        }
    };

    let siblings = match app.content.episodes(&ctx.season.id).await {
        Ok(episodes) => episodes,
        Err(e) => {
            warn!(season_id = %ctx.season.id, error = %e, "sibling fetch failed");
            vec![ctx.episode.clone()]
        }
    };

    let language_options = language_options(&ctx.episode);
    let selected_language = select_language(&ctx.episode, requested_language);
    let players = selected_language
        .as_deref()
        .map(|language| sorted_players(&ctx.episode, language))
        .unwrap_or_default();

    let position = siblings.iter().position(|ep| ep.id == ctx.episode.id);
    let prev_episode_id = position
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| siblings.get(i))
        .map(|ep| ep.id.clone());
    let next_episode_id = position
        .and_then(|i| siblings.get(i + 1))
        .map(|ep| ep.id.clone());
    let last_episode_id = siblings.last().map(|ep| ep.id.clone());

    let entry = HistoryEntry {
        series_id: ctx.series.id.clone(),
        series_title: ctx.series.title.clone(),
        episode_id: ctx.episode.id.clone(),
        episode_number: ctx.episode.episode_number,
        season_number: ctx.season.season_number,
        watch_progress: 0.0,
        completed: false,
        timestamp: 0,
    };
    if let Err(e) = app.library.add_to_history(entry).await {
        warn!(error = %e, "failed to record watch history");
    }
    if let Err(e) = app.content.increment_views(&ctx.series.id).await {
        warn!(error = %e, "failed to bump view count");
    }

    let season_label = ctx.season.label();
    Some(WatchPage {
        episode_title: format!(
            "{season_label} - Épisode {}",
            ctx.episode.episode_number
        ),
        series: ctx.series,
        season_label,
        episode: ctx.episode,
        siblings,
        language_options,
        selected_language,
        players,
        prev_episode_id,
        next_episode_id,
        last_episode_id,
    })
}

/// Selector entries for every tag the episode carries. Tags the registry
/// does not know keep the raw tag as their name.
fn language_options(episode: &Episode) -> Vec<LanguageOption> {
    let mut tags: Vec<&String> = episode.languages.keys().collect();
    tags.sort();
    tags.into_iter()
        .map(|tag| LanguageOption {
            tag: tag.clone(),
            name: language_info(tag)
                .map(|info| info.name.to_string())
                .unwrap_or_else(|| tag.clone()),
        })
        .collect()
}

/// The requested tag when the episode carries it, else the first available
/// one (alphabetically, for a stable pick).
fn select_language(episode: &Episode, requested: &str) -> Option<String> {
    if episode.languages.contains_key(requested) {
        return Some(requested.to_string());
    }
    episode.languages.keys().min().cloned()
}

/// Players for one language, ordered by the first number in their server
/// label ("Lecteur 2" before "Lecteur 10"); label-less entries go last.
fn sorted_players(episode: &Episode, language: &str) -> Vec<PlayerOption> {
    let links = episode.languages.get(language).cloned().unwrap_or_default();

    let mut indexed: Vec<(usize, _)> = links.into_iter().enumerate().collect();
    indexed.sort_by_key(|(_, link)| server_rank(link.server.as_deref()));

    indexed
        .into_iter()
        .enumerate()
        .map(|(display_index, (index, link))| PlayerOption {
            index,
            label: link
                .server
                .clone()
                .unwrap_or_else(|| format!("Lecteur {}", display_index + 1)),
            link: link.link,
        })
        .collect()
}

fn server_rank(server: Option<&str>) -> u32 {
    server
        .and_then(|s| RE_SERVER_NUM.find(s))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(UNNUMBERED_RANK)
}
