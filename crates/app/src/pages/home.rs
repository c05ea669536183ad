//! Home page: one cached catalogue snapshot fanned into display rows.

use cinetn_content::{ContentItem, aggregator};
use cinetn_core::types::ContentKind;

use super::{Card, cached_all_content, decorate};
use crate::services::App;

pub const HOME_CACHE_KEY: &str = "homepage_content";

/// Cards per row.
const ROW_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HomePage {
    pub nouveautes: Vec<Card>,
    pub animes: Vec<Card>,
    pub series: Vec<Card>,
    pub films: Vec<Card>,
}

pub async fn load(app: &App) -> HomePage {
    let all = cached_all_content(app, HOME_CACHE_KEY).await;

    let mut nouveautes = all.clone();
    nouveautes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    nouveautes.truncate(ROW_LEN);

    let animes = row_of(&all, ContentKind::Anime);
    let series = row_of(&all, ContentKind::Serie);
    let films = row_of(&all, ContentKind::Film);

    // One language set per distinct card, every item in flight together
    let mut ids: Vec<String> = nouveautes
        .iter()
        .chain(&animes)
        .chain(&series)
        .chain(&films)
        .map(|item| item.id.clone())
        .collect();
    ids.sort();
    ids.dedup();
    let languages = aggregator::available_languages_all(app.content.as_ref(), &ids).await;

    HomePage {
        nouveautes: decorate(nouveautes, &languages),
        animes: decorate(animes, &languages),
        series: decorate(series, &languages),
        films: decorate(films, &languages),
    }
}

fn row_of(all: &[ContentItem], kind: ContentKind) -> Vec<ContentItem> {
    all.iter()
        .filter(|item| item.kind == kind)
        .take(ROW_LEN)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{item, test_app};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn rows_are_split_by_kind_and_sorted_by_recency() {
        let mut fake = crate::testutil::FakeContent::default();
        let mut old = item("c1", "Vieux Film", ContentKind::Film);
        old.created_at = Some("2023-01-01T00:00:00Z".into());
        let mut new = item("c2", "Nouvel Anime", ContentKind::Anime);
        new.created_at = Some("2024-06-01T00:00:00Z".into());
        fake.items = vec![old, new];

        let fake = Arc::new(fake);
        let app = test_app(fake).await;

        let page = load(&app).await;
        assert_eq!(page.nouveautes[0].item.id, "c2");
        assert_eq!(page.nouveautes[1].item.id, "c1");
        assert_eq!(page.animes.len(), 1);
        assert_eq!(page.films.len(), 1);
        assert!(page.series.is_empty());
    }

    #[tokio::test]
    async fn second_load_serves_from_the_cache() {
        let fake = Arc::new(crate::testutil::FakeContent::with_items(vec![item(
            "c1",
            "Le Voyage",
            ContentKind::Serie,
        )]));
        let app = test_app(fake.clone()).await;

        load(&app).await;
        load(&app).await;

        assert_eq!(fake.all_content_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cards_carry_sorted_language_badges() {
        let mut fake = crate::testutil::FakeContent::with_items(vec![item(
            "c1",
            "Le Voyage",
            ContentKind::Anime,
        )]);
        fake.add_season("c1", "s1", 1);
        fake.add_episode("s1", "e1", &[("VOSTFR", 1), ("VF", 1)]);

        let app = test_app(Arc::new(fake)).await;
        let page = load(&app).await;

        assert_eq!(page.animes[0].languages, vec!["VF", "VOSTFR"]);
    }
}
