//! HTTP client for the hosted catalogue backend.
//!
//! The backend speaks the PostgREST dialect: one route per table, filters
//! and ordering as query parameters, stored procedures under `/rpc`.

use std::collections::HashMap;

use tracing::debug;

use crate::service::ContentService;
use crate::{
    ContentError, ContentFilters, ContentItem, Episode, EpisodeContext, PlayerLink, Season,
};
use cinetn_core::types::ContentKind;

pub struct CatalogueClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl CatalogueClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, ContentError> {
        let url = format!("{}/rest/v1{path}", self.base_url);
        debug!(url = %url, "catalogue request");

        let resp = self
            .client
            .get(&url)
            .query(params)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ContentError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ContentError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(ContentError::Service(format!(
                "backend returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| ContentError::Service(format!("parse JSON: {e}")))
    }

    async fn post_rpc(
        &self,
        function: &str,
        body: serde_json::Value,
    ) -> Result<(), ContentError> {
        let url = format!("{}/rest/v1/rpc/{function}", self.base_url);
        debug!(url = %url, "catalogue rpc");

        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ContentError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ContentError::Service(format!(
                "backend returned {}",
                resp.status()
            )));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl ContentService for CatalogueClient {
    async fn all_content(
        &self,
        filters: &ContentFilters,
    ) -> Result<Vec<ContentItem>, ContentError> {
        let mut params = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(kind) = filters.kind {
            params.push(("type", format!("eq.{kind}")));
        }
        if let Some(ref genre) = filters.genre {
            params.push(("genres", format!("cs.{{{genre}}}")));
        }
        if let Some(year) = filters.year {
            params.push(("year", format!("eq.{year}")));
        }

        let data = self.get_json("/series", &params).await?;
        let rows = data.as_array().cloned().unwrap_or_default();

        Ok(rows.iter().map(parse_content_item).collect())
    }

    async fn content_by_id(&self, id: &str) -> Result<Option<ContentItem>, ContentError> {
        let params = vec![
            ("select", "*".to_string()),
            ("id", format!("eq.{id}")),
            ("limit", "1".to_string()),
        ];

        let data = self.get_json("/series", &params).await?;
        let rows = data.as_array().cloned().unwrap_or_default();

        Ok(rows.first().map(parse_content_item))
    }

    async fn seasons(&self, series_id: &str) -> Result<Vec<Season>, ContentError> {
        let params = vec![
            ("select", "*".to_string()),
            ("series_id", format!("eq.{series_id}")),
            ("order", "season_number.asc".to_string()),
        ];

        let data = self.get_json("/seasons", &params).await?;
        let rows = data.as_array().cloned().unwrap_or_default();

        Ok(rows.iter().map(parse_season).collect())
    }

    async fn episodes(&self, season_id: &str) -> Result<Vec<Episode>, ContentError> {
        let params = vec![
            ("select", "*".to_string()),
            ("season_id", format!("eq.{season_id}")),
            ("order", "episode_number.asc".to_string()),
        ];

        let data = self.get_json("/episodes", &params).await?;
        let rows = data.as_array().cloned().unwrap_or_default();

        Ok(rows.iter().map(parse_episode).collect())
    }

    async fn episode_context(
        &self,
        episode_id: &str,
    ) -> Result<Option<EpisodeContext>, ContentError> {
        let params = vec![
            ("select", "*,seasons(*,series(*))".to_string()),
            ("id", format!("eq.{episode_id}")),
            ("limit", "1".to_string()),
        ];

        let data = self.get_json("/episodes", &params).await?;
        let rows = data.as_array().cloned().unwrap_or_default();

        Ok(rows.first().and_then(parse_episode_context))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ContentItem>, ContentError> {
        let params = vec![
            ("select", "*".to_string()),
            ("title", format!("ilike.*{query}*")),
            ("limit", limit.to_string()),
        ];

        let data = self.get_json("/series", &params).await?;
        let rows = data.as_array().cloned().unwrap_or_default();

        Ok(rows.iter().map(parse_content_item).collect())
    }

    async fn increment_views(&self, content_id: &str) -> Result<(), ContentError> {
        self.post_rpc(
            "increment_view_count",
            serde_json::json!({ "content_uuid": content_id }),
        )
        .await
    }
}

fn parse_content_item(row: &serde_json::Value) -> ContentItem {
    ContentItem {
        id: row["id"].as_str().unwrap_or_default().to_string(),
        title: row["title"].as_str().unwrap_or("Sans titre").to_string(),
        kind: row["type"]
            .as_str()
            .and_then(ContentKind::from_tag)
            .unwrap_or(ContentKind::Serie),
        year: row["year"].as_i64().map(|y| y as i32),
        rating: row["rating"].as_f64(),
        genres: row["genres"]
            .as_array()
            .map(|gs| {
                gs.iter()
                    .filter_map(|g| g.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default(),
        description: row["description"].as_str().map(|s| s.to_string()),
        poster_url: row["poster_url"].as_str().map(|s| s.to_string()),
        backdrop_url: row["backdrop_url"].as_str().map(|s| s.to_string()),
        views: row["views"].as_i64().unwrap_or(0),
        created_at: row["created_at"].as_str().map(|s| s.to_string()),
    }
}

fn parse_season(row: &serde_json::Value) -> Season {
    Season {
        id: row["id"].as_str().unwrap_or_default().to_string(),
        series_id: row["series_id"].as_str().unwrap_or_default().to_string(),
        season_number: row["season_number"].as_i64().unwrap_or(0) as i32,
        display_name: row["display_name"].as_str().map(|s| s.to_string()),
    }
}

fn parse_episode(row: &serde_json::Value) -> Episode {
    let languages: HashMap<String, Vec<PlayerLink>> = row["languages"]
        .as_object()
        .map(|langs| {
            langs
                .iter()
                .map(|(tag, links)| {
                    let links = links
                        .as_array()
                        .map(|ls| ls.iter().filter_map(parse_player_link).collect())
                        .unwrap_or_default();
                    (tag.clone(), links)
                })
                .collect()
        })
        .unwrap_or_default();

    Episode {
        id: row["id"].as_str().unwrap_or_default().to_string(),
        season_id: row["season_id"].as_str().unwrap_or_default().to_string(),
        episode_number: row["episode_number"].as_i64().unwrap_or(0) as i32,
        title: row["title"].as_str().map(|s| s.to_string()),
        languages,
    }
}

fn parse_player_link(value: &serde_json::Value) -> Option<PlayerLink> {
    value["link"].as_str().map(|link| PlayerLink {
        server: value["server"].as_str().map(|s| s.to_string()),
        link: link.to_string(),
    })
}

fn parse_episode_context(row: &serde_json::Value) -> Option<EpisodeContext> {
    let season_row = row.get("seasons")?;
    if !season_row.is_object() {
        return None;
    }
    let series_row = season_row.get("series")?;
    if !series_row.is_object() {
        return None;
    }

    Some(EpisodeContext {
        episode: parse_episode(row),
        season: parse_season(season_row),
        series: parse_content_item(series_row),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_content_item_from_row() {
        let row = json!({
            "id": "abc-123",
            "title": "Le Voyage",
            "type": "anime",
            "year": 2021,
            "rating": 8.7,
            "genres": ["Action", "Aventure"],
            "description": "Un périple.",
            "poster_url": "https://cdn.example/p.jpg",
            "views": 42,
            "created_at": "2024-05-01T10:00:00Z"
        });

        let item = parse_content_item(&row);
        assert_eq!(item.id, "abc-123");
        assert_eq!(item.title, "Le Voyage");
        assert_eq!(item.kind, ContentKind::Anime);
        assert_eq!(item.year, Some(2021));
        assert_eq!(item.genres, vec!["Action", "Aventure"]);
        assert_eq!(item.views, 42);
        assert_eq!(item.backdrop_url, None);
    }

    #[test]
    fn parse_content_item_tolerates_sparse_rows() {
        let item = parse_content_item(&json!({ "id": "x" }));
        assert_eq!(item.title, "Sans titre");
        assert_eq!(item.kind, ContentKind::Serie);
        assert!(item.genres.is_empty());
        assert_eq!(item.year, None);
    }

    #[test]
    fn parse_episode_languages_and_links() {
        let row = json!({
            "id": "ep1",
            "season_id": "s1",
            "episode_number": 3,
            "title": "Episode",
            "languages": {
                "VF": [
                    { "server": "Lecteur 1", "link": "https://v.example/1" },
                    { "link": "https://v.example/2" }
                ],
                "VOSTFR": [],
                "VA": [{ "server": "Lecteur 9" }]
            }
        });

        let ep = parse_episode(&row);
        assert_eq!(ep.episode_number, 3);
        assert_eq!(ep.languages["VF"].len(), 2);
        assert_eq!(ep.languages["VF"][0].server.as_deref(), Some("Lecteur 1"));
        assert_eq!(ep.languages["VF"][1].server, None);
        // Present but empty stays present; the aggregator decides relevance
        assert!(ep.languages["VOSTFR"].is_empty());
        // A link-less entry is not playable
        assert!(ep.languages["VA"].is_empty());
    }

    #[test]
    fn parse_episode_context_from_nested_row() {
        let row = json!({
            "id": "ep1",
            "season_id": "s1",
            "episode_number": 1,
            "languages": { "VF": [{ "link": "https://v.example/1" }] },
            "seasons": {
                "id": "s1",
                "series_id": "c1",
                "season_number": 1,
                "display_name": null,
                "series": { "id": "c1", "title": "Le Voyage", "type": "serie" }
            }
        });

        let ctx = parse_episode_context(&row).unwrap();
        assert_eq!(ctx.episode.id, "ep1");
        assert_eq!(ctx.season.label(), "Saison 1");
        assert_eq!(ctx.series.title, "Le Voyage");
    }

    #[test]
    fn parse_episode_context_requires_the_joined_rows() {
        assert!(parse_episode_context(&json!({ "id": "ep1" })).is_none());
        assert!(
            parse_episode_context(&json!({ "id": "ep1", "seasons": null })).is_none()
        );
    }
}
