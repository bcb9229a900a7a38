//! Router-level tests driven in-process with `oneshot`.
//!
//! Upstream sources are fixtures: a dead registry/feed pair exercises the
//! degradation path end to end, a healthy pair the upstream -> cache
//! transition. No network is touched.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use mandi_mitra::api::{create_router, AppState};
use mandi_mitra::category::CategoryRules;
use mandi_mitra::orchestrator::{NewsService, PriceService};
use mandi_mitra::upstream::{NewsSource, PriceQuery, PriceSource, UpstreamError};

struct DeadPrices;

#[async_trait]
impl PriceSource for DeadPrices {
    async fn fetch_raw(&self, _query: &PriceQuery) -> Result<Vec<Value>, UpstreamError> {
        Err(UpstreamError::Api("registry down".to_string()))
    }
}

struct DeadNews;

#[async_trait]
impl NewsSource for DeadNews {
    async fn fetch_raw(
        &self,
        _query: &str,
        _page_size: usize,
    ) -> Result<Vec<Value>, UpstreamError> {
        Err(UpstreamError::Api("feed down".to_string()))
    }
}

/// Registry fixture: records live in the Punjab partition (and answer
/// unscoped queries); every other partition is empty.
struct HealthyPrices {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PriceSource for HealthyPrices {
    async fn fetch_raw(&self, query: &PriceQuery) -> Result<Vec<Value>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match query.region.as_deref() {
            None | Some("Punjab") => Ok(vec![
                json!({"commodity": "Wheat", "price": "2100", "state": "Punjab", "district": "Amritsar", "market": "APMC Amritsar", "date": "2025-11-02"}),
                json!({"commodity": "Basmati Rice", "price": 3400, "state": "Punjab", "district": "Ludhiana", "market": "APMC Ludhiana", "date": "2025-11-02"}),
            ]),
            Some(_) => Ok(vec![]),
        }
    }
}

fn rules() -> CategoryRules {
    CategoryRules::from_toml_str(include_str!("../config/categories.toml"))
        .expect("shipped rules parse")
}

fn app_with(prices: Arc<dyn PriceSource>, news: Arc<dyn NewsSource>) -> Router {
    create_router(AppState {
        prices: Arc::new(PriceService::new(prices, 300, 35)),
        news: Arc::new(NewsService::new(news, 1800, Arc::new(rules()), 20)),
    })
}

fn dead_app() -> Router {
    app_with(Arc::new(DeadPrices), Arc::new(DeadNews))
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.expect("router response");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).expect("JSON body");
    (status, body)
}

#[tokio::test]
async fn health_reports_service_metadata() {
    let app = dead_app();
    let (status, body) = get_json(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "Mandi Mitra API");
    assert!(body["version"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_route_returns_json_404_envelope() {
    let app = dead_app();
    let (status, body) = get_json(&app, "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], "Endpoint not found");
}

#[tokio::test]
async fn prices_degrade_to_fallback_when_registry_is_down() {
    let app = dead_app();
    let (status, body) = get_json(&app, "/api/mandi-prices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true), "degradation is not a failure");
    assert_eq!(body["source"], "fallback");
    assert!(!body["prices"].as_array().unwrap().is_empty());
    assert!(body["message"].as_str().unwrap().contains("sample data"));
}

#[tokio::test]
async fn filters_apply_to_fallback_data_and_are_echoed() {
    let app = dead_app();
    let (status, body) = get_json(&app, "/api/mandi-prices?region=Karnataka").await;
    assert_eq!(status, StatusCode::OK);
    let prices = body["prices"].as_array().unwrap();
    assert!(!prices.is_empty());
    assert!(prices.iter().all(|p| p["region"] == "Karnataka"));
    assert_eq!(body["filters_applied"]["region"], "Karnataka");
    assert_eq!(body["filters_applied"]["commodity"], "");
}

#[tokio::test]
async fn combined_filters_use_and_semantics() {
    let app = dead_app();
    let (_, body) = get_json(&app, "/api/mandi-prices?region=Punjab&commodity=Wheat").await;
    let prices = body["prices"].as_array().unwrap();
    assert!(!prices.is_empty());
    for p in prices {
        assert_eq!(p["region"], "Punjab");
        assert_eq!(p["name"], "Wheat");
    }
}

#[tokio::test]
async fn commodity_lookup_matches_substrings_case_insensitively() {
    let app = dead_app();
    let (status, body) = get_json(&app, "/api/mandi-prices/whe").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["commodity"], "whe");
    let prices = body["prices"].as_array().unwrap();
    assert!(!prices.is_empty());
    assert!(prices.iter().all(|p| p["name"] == "Wheat"));
}

#[tokio::test]
async fn commodity_lookup_miss_is_not_found_not_an_error() {
    let app = dead_app();
    let (status, body) = get_json(&app, "/api/mandi-prices/saffron").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("No prices found for commodity: saffron"));
    // distinctly not the 500 shape
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn news_degrades_to_fallback_and_category_filters() {
    let app = dead_app();
    let (status, body) = get_json(&app, "/api/news?category=weather").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["category"], "weather");
    let articles = body["articles"].as_array().unwrap();
    assert!(!articles.is_empty());
    assert!(articles.iter().all(|a| a["category"] == "weather"));
}

#[tokio::test]
async fn unknown_news_category_is_treated_as_all() {
    let app = dead_app();
    let (status, body) = get_json(&app, "/api/news?category=sports").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "all");
    assert!(body["articles"].as_array().unwrap().len() > 1);
}

#[tokio::test]
async fn news_limit_caps_the_article_list() {
    let app = dead_app();
    let (_, body) = get_json(&app, "/api/news?limit=2").await;
    assert_eq!(body["articles"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn stats_expose_cache_state_per_domain() {
    let app = dead_app();
    let (status, body) = get_json(&app, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let prices = &body["cache_info"]["prices"];
    assert_eq!(prices["populated"], json!(false));
    assert_eq!(prices["valid"], json!(false));
    assert_eq!(prices["entries"], 0);
    assert_eq!(prices["window_secs"], 300);
    assert_eq!(body["cache_info"]["news"]["window_secs"], 1800);
    assert!(body["endpoints"]["mandi_prices"].is_string());
}

#[tokio::test]
async fn second_unfiltered_request_is_served_from_cache() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = app_with(
        Arc::new(HealthyPrices {
            calls: calls.clone(),
        }),
        Arc::new(DeadNews),
    );

    let (_, first) = get_json(&app, "/api/mandi-prices").await;
    assert_eq!(first["source"], "upstream");
    let after_first = calls.load(Ordering::SeqCst);
    assert!(after_first >= 1);

    let (_, second) = get_json(&app, "/api/mandi-prices").await;
    assert_eq!(second["source"], "cache");
    assert_eq!(
        calls.load(Ordering::SeqCst),
        after_first,
        "no upstream call on a cache hit"
    );
    assert_eq!(second["prices"], first["prices"]);

    // and the diagnostics agree
    let (_, stats) = get_json(&app, "/api/stats").await;
    assert_eq!(stats["cache_info"]["prices"]["populated"], json!(true));
    assert_eq!(stats["cache_info"]["prices"]["valid"], json!(true));
    assert_eq!(stats["cache_info"]["prices"]["entries"], 2);
}

#[tokio::test]
async fn refresh_flag_bypasses_a_fresh_cache() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = app_with(
        Arc::new(HealthyPrices {
            calls: calls.clone(),
        }),
        Arc::new(DeadNews),
    );

    get_json(&app, "/api/mandi-prices").await;
    let after_first = calls.load(Ordering::SeqCst);

    let (_, body) = get_json(&app, "/api/mandi-prices?refresh=true").await;
    assert_eq!(body["source"], "upstream");
    assert!(calls.load(Ordering::SeqCst) > after_first);
}

#[tokio::test]
async fn prices_are_sorted_descending_by_price() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = app_with(Arc::new(HealthyPrices { calls }), Arc::new(DeadNews));
    let (_, body) = get_json(&app, "/api/mandi-prices").await;
    let prices = body["prices"].as_array().unwrap();
    assert_eq!(prices[0]["name"], "Basmati Rice");
    assert_eq!(prices[1]["name"], "Wheat");
}
