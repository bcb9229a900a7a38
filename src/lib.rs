// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod cache;
pub mod category;
pub mod config;
pub mod fallback;
pub mod fetch;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod orchestrator;
pub mod upstream;

use std::sync::Arc;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::model::{FilterSpec, NewsArticle, NewsCategory, PriceRecord, Provenance};

use crate::category::CategoryRules;
use crate::config::AppConfig;
use crate::orchestrator::{NewsService, PriceService};
use crate::upstream::{newsfeed::NewsFeedClient, registry::RegistryClient};

/// Build the application state for a config, wiring the real upstream
/// clients. Tests construct `AppState` directly with fixture sources instead.
pub fn build_state(cfg: &AppConfig, rules: CategoryRules) -> AppState {
    let registry = Arc::new(RegistryClient::new(
        cfg.registry_base_url.clone(),
        cfg.registry_api_key.clone(),
    ));
    let feed = Arc::new(NewsFeedClient::new(
        cfg.news_base_url.clone(),
        cfg.news_api_key.clone(),
    ));
    AppState {
        prices: Arc::new(PriceService::new(
            registry,
            cfg.price_cache_secs,
            cfg.price_limit,
        )),
        news: Arc::new(NewsService::new(
            feed,
            cfg.news_cache_secs,
            Arc::new(rules),
            cfg.news_limit,
        )),
    }
}

/// Convenience builder: env config + shipped category rules -> router.
pub fn app() -> anyhow::Result<axum::Router> {
    let cfg = AppConfig::from_env();
    let rules = CategoryRules::load()?;
    Ok(create_router(build_state(&cfg, rules)))
}
