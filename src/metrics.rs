//! metrics.rs — Prometheus recorder wiring and series registration.
//!
//! The recorder is installed from the binary entrypoint only; library code
//! (and the in-process test routers) just emits through the `metrics` facade,
//! which is a no-op when no recorder is present.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time registration so the series show up on /metrics with help text.
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("price_requests_total", "Price queries served.");
        describe_counter!("news_requests_total", "News queries served.");
        describe_counter!(
            "cache_hits_total",
            "Requests answered from a valid cache entry."
        );
        describe_counter!(
            "upstream_errors_total",
            "Primary upstream fetches that failed or normalized to nothing."
        );
        describe_counter!(
            "upstream_partition_errors_total",
            "Partition calls skipped during the diverse-fetch sweep."
        );
        describe_counter!(
            "fallback_served_total",
            "Responses drawn from the static dataset."
        );
        describe_gauge!(
            "price_cache_window_secs",
            "Configured price cache validity window."
        );
        describe_gauge!(
            "news_cache_window_secs",
            "Configured news cache validity window."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and publish the static window gauges.
    pub fn init(price_window_secs: i64, news_window_secs: i64) -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");

        ensure_metrics_described();
        gauge!("price_cache_window_secs").set(price_window_secs as f64);
        gauge!("news_cache_window_secs").set(news_window_secs as f64);

        Self { handle }
    }

    /// Router exposing `/metrics` in the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
