//! Catalogue page: the full listing with client-side filters.

use std::collections::HashSet;

use cinetn_content::{ContentItem, aggregator};
use cinetn_core::types::ContentKind;

use super::{Card, cached_all_content, decorate};
use crate::services::App;

pub const CATALOGUE_CACHE_KEY: &str = "catalogue_content";

/// Active filter state. `None` (or an empty search) means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub kind: Option<ContentKind>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub search: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CataloguePage {
    pub results: Vec<Card>,
    pub result_count: usize,
    /// Sorted unique genres across the whole catalogue.
    pub genre_options: Vec<String>,
    /// Unique years, newest first.
    pub year_options: Vec<i32>,
}

pub async fn load(app: &App, filters: &Filters) -> CataloguePage {
    let all = cached_all_content(app, CATALOGUE_CACHE_KEY).await;

    let genre_options = genre_options(&all);
    let year_options = year_options(&all);

    // Language badges drive both filtering and display, so every item gets
    // its live set, all in flight together.
    let ids: Vec<String> = all.iter().map(|item| item.id.clone()).collect();
    let languages = aggregator::available_languages_all(app.content.as_ref(), &ids).await;

    let matching: Vec<ContentItem> = all
        .into_iter()
        .filter(|item| matches(item, languages.get(&item.id), filters))
        .collect();

    let results = decorate(matching, &languages);
    CataloguePage {
        result_count: results.len(),
        results,
        genre_options,
        year_options,
    }
}

fn matches(
    item: &ContentItem,
    languages: Option<&HashSet<String>>,
    filters: &Filters,
) -> bool {
    let matches_kind = filters.kind.is_none_or(|kind| item.kind == kind);
    let matches_year = filters.year.is_none_or(|year| item.year == Some(year));
    let matches_genre = filters
        .genre
        .as_ref()
        .is_none_or(|genre| item.genres.iter().any(|g| g == genre));
    let matches_language = filters
        .language
        .as_ref()
        .is_none_or(|language| languages.is_some_and(|set| set.contains(language)));
    let matches_search = filters.search.is_empty()
        || item
            .title
            .to_lowercase()
            .contains(&filters.search.to_lowercase());

    matches_kind && matches_year && matches_genre && matches_language && matches_search
}

fn genre_options(all: &[ContentItem]) -> Vec<String> {
    let mut genres: Vec<String> = all
        .iter()
        .flat_map(|item| item.genres.iter().cloned())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    genres.sort();
    genres
}

fn year_options(all: &[ContentItem]) -> Vec<i32> {
    let mut years: Vec<i32> = all
        .iter()
        .filter_map(|item| item.year)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    years.sort_by(|a, b| b.cmp(a));
    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{item, test_app};
    use std::sync::Arc;

    fn fixture() -> crate::testutil::FakeContent {
        let mut a = item("c1", "Le Voyage", ContentKind::Anime);
        a.year = Some(2021);
        a.genres = vec!["Action".into(), "Aventure".into()];
        let mut b = item("c2", "La Colline", ContentKind::Film);
        b.year = Some(2019);
        b.genres = vec!["Drame".into()];

        let mut fake = crate::testutil::FakeContent::with_items(vec![a, b]);
        fake.add_season("c1", "s1", 1);
        fake.add_episode("s1", "e1", &[("VF", 1)]);
        fake.add_season("c2", "s2", 1);
        fake.add_episode("s2", "e2", &[("VOSTFR", 1)]);
        fake
    }

    #[tokio::test]
    async fn unfiltered_listing_counts_everything() {
        let app = test_app(Arc::new(fixture())).await;
        let page = load(&app, &Filters::default()).await;

        assert_eq!(page.result_count, 2);
        assert_eq!(page.genre_options, vec!["Action", "Aventure", "Drame"]);
        assert_eq!(page.year_options, vec![2021, 2019]);
    }

    #[tokio::test]
    async fn filters_narrow_by_kind_year_genre_and_title() {
        let app = test_app(Arc::new(fixture())).await;

        let by_kind = load(
            &app,
            &Filters {
                kind: Some(ContentKind::Film),
                ..Filters::default()
            },
        )
        .await;
        assert_eq!(by_kind.result_count, 1);
        assert_eq!(by_kind.results[0].item.id, "c2");

        let by_genre = load(
            &app,
            &Filters {
                genre: Some("Aventure".into()),
                ..Filters::default()
            },
        )
        .await;
        assert_eq!(by_genre.results[0].item.id, "c1");

        let by_search = load(
            &app,
            &Filters {
                search: "voyage".into(),
                ..Filters::default()
            },
        )
        .await;
        assert_eq!(by_search.result_count, 1);

        let by_year = load(
            &app,
            &Filters {
                year: Some(1999),
                ..Filters::default()
            },
        )
        .await;
        assert_eq!(by_year.result_count, 0);
    }

    #[tokio::test]
    async fn language_filter_uses_the_live_sets() {
        let app = test_app(Arc::new(fixture())).await;

        let page = load(
            &app,
            &Filters {
                language: Some("VF".into()),
                ..Filters::default()
            },
        )
        .await;

        assert_eq!(page.result_count, 1);
        assert_eq!(page.results[0].item.id, "c1");
        assert_eq!(page.results[0].languages, vec!["VF"]);
    }
}
