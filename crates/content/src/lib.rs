pub mod aggregator;
pub mod rest;
pub mod service;

use std::collections::HashMap;

use cinetn_core::types::ContentKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("service error: {0}")]
    Service(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("not found")]
    NotFound,
}

/// One catalogue title (série, anime, or film).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub kind: ContentKind,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub genres: Vec<String>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub views: i64,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Season {
    pub id: String,
    pub series_id: String,
    pub season_number: i32,
    pub display_name: Option<String>,
}

impl Season {
    /// Label shown for the season. Empty, whitespace-only, or purely
    /// numeric display names render as "Saison {n}".
    pub fn label(&self) -> String {
        match &self.display_name {
            Some(name) if !name.trim().is_empty() && name.trim().parse::<f64>().is_err() => {
                name.clone()
            }
            _ => format!("Saison {}", self.season_number),
        }
    }
}

/// One playable link, as edited by administrators.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayerLink {
    pub server: Option<String>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Episode {
    pub id: String,
    pub season_id: String,
    pub episode_number: i32,
    pub title: Option<String>,
    /// Version tag -> ordered list of playable links.
    pub languages: HashMap<String, Vec<PlayerLink>>,
}

/// An episode joined with its season and series, as the watch page loads it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EpisodeContext {
    pub episode: Episode,
    pub season: Season,
    pub series: ContentItem,
}

/// Optional narrowing filters for catalogue queries.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContentFilters {
    pub kind: Option<ContentKind>,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(display_name: Option<&str>) -> Season {
        Season {
            id: "s1".into(),
            series_id: "c1".into(),
            season_number: 2,
            display_name: display_name.map(str::to_string),
        }
    }

    #[test]
    fn season_label_prefers_a_real_display_name() {
        assert_eq!(season(Some("Arc Final")).label(), "Arc Final");
    }

    #[test]
    fn season_label_falls_back_for_empty_or_numeric_names() {
        assert_eq!(season(None).label(), "Saison 2");
        assert_eq!(season(Some("")).label(), "Saison 2");
        assert_eq!(season(Some("   ")).label(), "Saison 2");
        assert_eq!(season(Some("2")).label(), "Saison 2");
    }
}
