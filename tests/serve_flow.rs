//! Service-level scenarios for the cache -> fetch -> fallback chain, driven
//! with fixture sources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use mandi_mitra::category::CategoryRules;
use mandi_mitra::model::{FilterSpec, NewsCategory, Provenance};
use mandi_mitra::orchestrator::{NewsService, PriceService};
use mandi_mitra::upstream::{NewsSource, PriceQuery, PriceSource, UpstreamError};

fn rules() -> Arc<CategoryRules> {
    Arc::new(
        CategoryRules::from_toml_str(include_str!("../config/categories.toml"))
            .expect("shipped rules parse"),
    )
}

/// Registry fixture whose Punjab partition holds 40 raw records, of which
/// only the first 10 survive normalization.
struct NoisyRegistry;

#[async_trait]
impl PriceSource for NoisyRegistry {
    async fn fetch_raw(&self, query: &PriceQuery) -> Result<Vec<Value>, UpstreamError> {
        match query.region.as_deref() {
            None | Some("Punjab") => {
                let mut batch: Vec<Value> = (0..10)
                    .map(|i| {
                        json!({
                            "commodity": format!("Commodity {i}"),
                            "price": 1000 + i,
                            "state": "Punjab",
                            "district": "Amritsar"
                        })
                    })
                    .collect();
                // 30 records that fail validation: sentinel names, short
                // names, zero or unparseable prices
                for i in 0..30 {
                    batch.push(match i % 3 {
                        0 => json!({"commodity": "Unknown", "price": 500}),
                        1 => json!({"commodity": "ok", "price": 500}),
                        _ => json!({"commodity": "Gram", "price": "n/a"}),
                    });
                }
                Ok(batch)
            }
            Some(_) => Ok(vec![]),
        }
    }
}

#[tokio::test]
async fn noisy_upstream_batch_yields_capped_upstream_response_and_caches() {
    let svc = PriceService::new(Arc::new(NoisyRegistry), 300, 35);
    let out = svc.serve(&FilterSpec::default(), false).await.unwrap();

    assert_eq!(out.provenance, Provenance::Upstream);
    assert_eq!(out.records.len(), 10, "only valid records are served");
    assert!(out.records.len() <= 35);

    let stats = svc.cache_stats().unwrap();
    assert!(stats.populated && stats.valid);
    assert_eq!(stats.entries, 10);

    // second unfiltered request comes back from cache
    let again = svc.serve(&FilterSpec::default(), false).await.unwrap();
    assert_eq!(again.provenance, Provenance::Cache);
    assert_eq!(again.records, out.records);
}

/// Feed fixture: one batch with one article per category, counting calls.
struct FourCategoryFeed {
    calls: AtomicUsize,
}

#[async_trait]
impl NewsSource for FourCategoryFeed {
    async fn fetch_raw(
        &self,
        _query: &str,
        _page_size: usize,
    ) -> Result<Vec<Value>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            json!({
                "title": "Cabinet approves new fertiliser subsidy scheme",
                "description": "The government cleared an expanded subsidy outlay for the coming season.",
                "publishedAt": "2025-11-04T09:00:00Z",
                "url": "https://example.com/1",
                "source": {"name": "Wire"}
            }),
            json!({
                "title": "Mandi prices steady as arrivals normalise",
                "description": "Wholesale markets reported stable trade volumes across commodities.",
                "publishedAt": "2025-11-03T09:00:00Z",
                "url": "https://example.com/2",
                "source": {"name": "Wire"}
            }),
            json!({
                "title": "Monsoon revival expected over the weekend",
                "description": "Forecasters see heavy rainfall returning to central districts shortly.",
                "publishedAt": "2025-11-02T09:00:00Z",
                "url": "https://example.com/3",
                "source": {"name": "Wire"}
            }),
            json!({
                "title": "Farm drone startup raises a new funding round",
                "description": "The agritech company plans to expand its spraying technology fleet.",
                "publishedAt": "2025-11-01T09:00:00Z",
                "url": "https://example.com/4",
                "source": {"name": "Wire"}
            }),
        ])
    }
}

#[tokio::test]
async fn broad_news_query_caches_then_category_query_bypasses() {
    let feed = Arc::new(FourCategoryFeed {
        calls: AtomicUsize::new(0),
    });
    let svc = NewsService::new(feed.clone(), 1800, rules(), 20);

    let first = svc.serve(None, None, false).await.unwrap();
    assert_eq!(first.provenance, Provenance::Upstream);
    assert_eq!(first.records.len(), 4);
    assert_eq!(feed.calls.load(Ordering::SeqCst), 1);

    // newest first, ids assigned pre-sort
    assert_eq!(first.records[0].date, "2025-11-04");
    assert_eq!(first.records[0].id, 1);

    let cached = svc.serve(None, None, false).await.unwrap();
    assert_eq!(cached.provenance, Provenance::Cache);
    assert_eq!(feed.calls.load(Ordering::SeqCst), 1, "cache hit stays local");

    // a concrete category forces a live fetch despite the fresh cache
    let weather = svc
        .serve(Some(NewsCategory::Weather), None, false)
        .await
        .unwrap();
    assert_eq!(weather.provenance, Provenance::Upstream);
    assert_eq!(feed.calls.load(Ordering::SeqCst), 2);
    assert_eq!(weather.records.len(), 1);
    assert_eq!(weather.records[0].category, NewsCategory::Weather);
}

#[tokio::test]
async fn categories_are_inferred_in_priority_order() {
    let feed = Arc::new(FourCategoryFeed {
        calls: AtomicUsize::new(0),
    });
    let svc = NewsService::new(feed, 1800, rules(), 20);
    let out = svc.serve(None, None, false).await.unwrap();

    let by_date: Vec<(String, NewsCategory)> = out
        .records
        .iter()
        .map(|a| (a.date.clone(), a.category))
        .collect();
    assert_eq!(
        by_date,
        vec![
            ("2025-11-04".to_string(), NewsCategory::Policy),
            ("2025-11-03".to_string(), NewsCategory::Market),
            ("2025-11-02".to_string(), NewsCategory::Weather),
            ("2025-11-01".to_string(), NewsCategory::Technology),
        ]
    );
}

#[tokio::test]
async fn news_force_refresh_bypasses_cache() {
    let feed = Arc::new(FourCategoryFeed {
        calls: AtomicUsize::new(0),
    });
    let svc = NewsService::new(feed.clone(), 1800, rules(), 20);

    svc.serve(None, None, false).await.unwrap();
    let out = svc.serve(None, None, true).await.unwrap();
    assert_eq!(out.provenance, Provenance::Upstream);
    assert_eq!(feed.calls.load(Ordering::SeqCst), 2);
}
