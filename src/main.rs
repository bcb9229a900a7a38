//! Mandi Mitra — Binary Entrypoint
//! Boots the Axum HTTP server: routes, shared state, CORS, and /metrics.
//!
//! See `README.md` for quickstart.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mandi_mitra::config::AppConfig;
use mandi_mitra::metrics::Metrics;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - MANDI_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("MANDI_DEV_LOG").ok().is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mandi_mitra=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments. This is where the
    // REGISTRY_API_KEY / NEWS_API_KEY values come from when running locally.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let cfg = AppConfig::from_env();

    // Prometheus recorder lives in the binary only; the library and tests
    // emit through the facade without one.
    let metrics = Metrics::init(cfg.price_cache_secs, cfg.news_cache_secs);

    let router = mandi_mitra::app()
        .expect("failed to build application router")
        .merge(metrics.router());

    Ok(router.into())
}
