use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cinetn_app::config::AppConfig;
use cinetn_app::library::Library;
use cinetn_app::pages;
use cinetn_app::services::App;
use cinetn_cache::{SqliteStore, TieredCache};
use cinetn_content::rest::CatalogueClient;
use cinetn_content::service::ContentService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    info!(db_path = %config.db_path, api_base = %config.api_base, "starting");

    let pool = cinetn_db::connect(&config.db_path)
        .await
        .context("failed to open local store")?;
    cinetn_db::migrate::run(&pool)
        .await
        .context("failed to run migrations")?;

    let store = SqliteStore::with_quota(pool, config.quota_bytes);
    let content: Arc<dyn ContentService> = Arc::new(CatalogueClient::new(
        config.api_base.clone(),
        config.api_key.clone(),
    ));

    let app = App {
        content,
        cache: TieredCache::new(store.clone()),
        library: Library::new(store),
    };

    match app.library.user_id().await {
        Ok(user) => info!(user = %user, "visitor id"),
        Err(e) => tracing::warn!(error = %e, "failed to load visitor id"),
    }

    // Headless render of the landing pages
    let home = pages::home::load(&app).await;
    println!("Nouveautés ({}):", home.nouveautes.len());
    for card in &home.nouveautes {
        println!("  {} [{}]", card.item.title, card.languages.join(", "));
    }

    let catalogue = pages::catalogue::load(&app, &pages::catalogue::Filters::default()).await;
    println!(
        "Catalogue: {} résultats, {} genres, {} années",
        catalogue.result_count,
        catalogue.genre_options.len(),
        catalogue.year_options.len()
    );

    let stats = app.cache.stats().await;
    info!(
        memory = stats.memory_entries,
        storage = stats.storage_entries,
        "cache state"
    );

    Ok(())
}
