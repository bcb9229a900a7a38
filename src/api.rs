//! api.rs — HTTP surface: routes, query params, and response envelopes.
//!
//! Handlers stay thin: parameter cleanup, one call into the domain service,
//! envelope assembly. Degraded responses (fallback data) are still `success:
//! true`; only an internal orchestration failure produces a 500.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::model::{FilterSpec, NewsArticle, NewsCategory, PriceRecord, Provenance};
use crate::orchestrator::{NewsService, PriceService, ServeOutcome};

pub const SERVICE_NAME: &str = "Mandi Mitra API";

#[derive(Clone)]
pub struct AppState {
    pub prices: Arc<PriceService>,
    pub news: Arc<NewsService>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/mandi-prices", get(mandi_prices))
        .route("/api/mandi-prices/{commodity}", get(commodity_lookup))
        .route("/api/news", get(news))
        .route("/api/stats", get(stats))
        .fallback(not_found)
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct PriceParams {
    region: Option<String>,
    subregion: Option<String>,
    commodity: Option<String>,
    #[serde(default)]
    refresh: bool,
}

#[derive(Debug, Default, Deserialize)]
struct NewsParams {
    category: Option<String>,
    limit: Option<usize>,
    #[serde(default)]
    refresh: bool,
}

#[derive(Serialize)]
struct FiltersApplied {
    region: String,
    subregion: String,
    commodity: String,
}

impl FiltersApplied {
    fn from_spec(spec: &FilterSpec) -> Self {
        Self {
            region: spec.region.clone().unwrap_or_default(),
            subregion: spec.subregion.clone().unwrap_or_default(),
            commodity: spec.commodity.clone().unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct PriceEnvelope {
    success: bool,
    prices: Vec<PriceRecord>,
    source: Provenance,
    timestamp: String,
    message: String,
    filters_applied: FiltersApplied,
}

#[derive(Serialize)]
struct NewsEnvelope {
    success: bool,
    articles: Vec<NewsArticle>,
    source: Provenance,
    timestamp: String,
    message: String,
    category: String,
}

#[derive(Serialize)]
struct LookupEnvelope {
    success: bool,
    commodity: String,
    prices: Vec<PriceRecord>,
    source: Provenance,
    timestamp: String,
}

/// Trimmed, non-empty query param or nothing.
fn clean(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

fn iso(ts: chrono::DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn internal_error(err: anyhow::Error) -> Response {
    tracing::error!(error = %err, "internal error while serving request");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": err.to_string(),
            "message": "Internal server error"
        })),
    )
        .into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": iso(Utc::now()),
        "version": env!("CARGO_PKG_VERSION"),
        "service": SERVICE_NAME,
    }))
}

async fn mandi_prices(
    State(state): State<AppState>,
    Query(params): Query<PriceParams>,
) -> Response {
    let filters = FilterSpec {
        region: clean(params.region),
        subregion: clean(params.subregion),
        commodity: clean(params.commodity),
    };
    match state.prices.serve(&filters, params.refresh).await {
        Ok(out) => {
            let ServeOutcome {
                records,
                provenance,
                timestamp,
                message,
            } = out;
            Json(PriceEnvelope {
                success: true,
                prices: records,
                source: provenance,
                timestamp: iso(timestamp),
                message,
                filters_applied: FiltersApplied::from_spec(&filters),
            })
            .into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// Thin projection over the unfiltered price query: case-insensitive
/// substring match on the commodity name. Zero matches is a normal "not
/// found" outcome, not a server error.
async fn commodity_lookup(
    State(state): State<AppState>,
    Path(commodity): Path<String>,
) -> Response {
    match state.prices.serve(&FilterSpec::default(), false).await {
        Ok(out) => {
            let needle = commodity.trim().to_lowercase();
            let matches: Vec<PriceRecord> = out
                .records
                .into_iter()
                .filter(|r| r.name.to_lowercase().contains(&needle))
                .collect();
            if matches.is_empty() {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "success": false,
                        "message": format!("No prices found for commodity: {commodity}")
                    })),
                )
                    .into_response();
            }
            Json(LookupEnvelope {
                success: true,
                commodity,
                prices: matches,
                source: out.provenance,
                timestamp: iso(out.timestamp),
            })
            .into_response()
        }
        Err(e) => internal_error(e),
    }
}

async fn news(State(state): State<AppState>, Query(params): Query<NewsParams>) -> Response {
    // "all", empty, or an unrecognized name all mean "no category filter".
    let category = clean(params.category.clone()).and_then(|c| NewsCategory::parse(&c));
    match state.news.serve(category, params.limit, params.refresh).await {
        Ok(out) => Json(NewsEnvelope {
            success: true,
            articles: out.records,
            source: out.provenance,
            timestamp: iso(out.timestamp),
            message: out.message,
            category: category.map(|c| c.to_string()).unwrap_or_else(|| "all".to_string()),
        })
        .into_response(),
        Err(e) => internal_error(e),
    }
}

async fn stats(State(state): State<AppState>) -> Response {
    match (state.prices.cache_stats(), state.news.cache_stats()) {
        (Ok(prices), Ok(news)) => Json(json!({
            "success": true,
            "cache_info": {
                "prices": prices,
                "news": news,
            },
            "endpoints": {
                "health": "/api/health",
                "mandi_prices": "/api/mandi-prices",
                "commodity_price": "/api/mandi-prices/{commodity}",
                "news": "/api/news",
                "stats": "/api/stats",
            },
            "timestamp": iso(Utc::now()),
        }))
        .into_response(),
        (Err(e), _) | (_, Err(e)) => internal_error(e),
    }
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Endpoint not found",
            "message": "The requested API endpoint does not exist"
        })),
    )
        .into_response()
}
