//! orchestrator.rs — per-request decision logic: serve from cache, fetch
//! fresh, or degrade to the static dataset.
//!
//! The chain is cache → live fetch → fallback. Upstream failures and batches
//! that normalize to nothing both degrade to the next source; they never
//! surface as request errors. An `Err` out of these services means the
//! orchestration itself broke (poisoned state), which is the one case the
//! HTTP layer reports as an internal error.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use metrics::counter;

use crate::cache::{CacheStats, CacheStore};
use crate::category::CategoryRules;
use crate::fallback;
use crate::fetch::{fetch_diverse, fetch_scoped, DIVERSE_REGIONS};
use crate::metrics::ensure_metrics_described;
use crate::model::{filter_news, FilterSpec, NewsArticle, NewsCategory, PriceRecord, Provenance};
use crate::normalize::{normalize_news_batch, normalize_price_batch};
use crate::upstream::{NewsSource, PriceSource, UpstreamError};

/// What a query resolved to, with enough context for the response envelope.
#[derive(Debug, Clone)]
pub struct ServeOutcome<T> {
    pub records: Vec<T>,
    pub provenance: Provenance,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

pub struct PriceService {
    source: Arc<dyn PriceSource>,
    cache: CacheStore<PriceRecord>,
    total_limit: usize,
}

impl PriceService {
    pub fn new(source: Arc<dyn PriceSource>, window_secs: i64, total_limit: usize) -> Self {
        Self {
            source,
            cache: CacheStore::new(window_secs),
            total_limit,
        }
    }

    pub fn cache_stats(&self) -> Result<CacheStats> {
        self.cache.stats()
    }

    /// Serve a price query. Any filter, like an explicit refresh, bypasses
    /// the cache even when it is still fresh.
    pub async fn serve(
        &self,
        filters: &FilterSpec,
        force_refresh: bool,
    ) -> Result<ServeOutcome<PriceRecord>> {
        ensure_metrics_described();
        counter!("price_requests_total").increment(1);

        if !force_refresh && filters.is_empty() {
            if let Some((data, fetched_at)) = self.cache.read_if_valid()? {
                counter!("cache_hits_total").increment(1);
                return Ok(ServeOutcome {
                    records: filters.apply(data),
                    provenance: Provenance::Cache,
                    timestamp: fetched_at,
                    message: "Data retrieved from cache".to_string(),
                });
            }
        }

        match self.fetch_fresh(filters).await {
            Ok(batch) if !batch.is_empty() => {
                self.cache.put(batch.clone())?;
                tracing::info!(count = batch.len(), "refreshed price cache from upstream");
                Ok(ServeOutcome {
                    records: filters.apply(batch),
                    provenance: Provenance::Upstream,
                    timestamp: Utc::now(),
                    message: "Live data fetched successfully".to_string(),
                })
            }
            Ok(_) => {
                tracing::warn!("upstream batch normalized to nothing; serving sample data");
                counter!("upstream_errors_total").increment(1);
                Ok(self.fallback_outcome(filters))
            }
            Err(e) => {
                tracing::warn!(error = %e, "price fetch failed; serving sample data");
                counter!("upstream_errors_total").increment(1);
                Ok(self.fallback_outcome(filters))
            }
        }
    }

    async fn fetch_fresh(&self, filters: &FilterSpec) -> Result<Vec<PriceRecord>, UpstreamError> {
        let raw = if filters.is_empty() {
            fetch_diverse(self.source.as_ref(), &DIVERSE_REGIONS, self.total_limit).await?
        } else {
            fetch_scoped(self.source.as_ref(), filters, self.total_limit).await?
        };
        Ok(normalize_price_batch(&raw))
    }

    fn fallback_outcome(&self, filters: &FilterSpec) -> ServeOutcome<PriceRecord> {
        counter!("fallback_served_total").increment(1);
        ServeOutcome {
            records: filters.apply(fallback::fallback_prices()),
            provenance: Provenance::Fallback,
            timestamp: Utc::now(),
            message: "Using sample data - upstream unavailable".to_string(),
        }
    }
}

pub struct NewsService {
    source: Arc<dyn NewsSource>,
    cache: CacheStore<NewsArticle>,
    rules: Arc<CategoryRules>,
    default_limit: usize,
}

impl NewsService {
    pub fn new(
        source: Arc<dyn NewsSource>,
        window_secs: i64,
        rules: Arc<CategoryRules>,
        default_limit: usize,
    ) -> Self {
        Self {
            source,
            cache: CacheStore::new(window_secs),
            rules,
            default_limit,
        }
    }

    pub fn cache_stats(&self) -> Result<CacheStats> {
        self.cache.stats()
    }

    /// Serve a news query. A concrete category (anything but "all") bypasses
    /// the cache, since the cached batch was fetched with the broad query.
    pub async fn serve(
        &self,
        category: Option<NewsCategory>,
        limit: Option<usize>,
        force_refresh: bool,
    ) -> Result<ServeOutcome<NewsArticle>> {
        ensure_metrics_described();
        counter!("news_requests_total").increment(1);
        let page_size = limit.unwrap_or(self.default_limit).clamp(1, 100);

        if !force_refresh && category.is_none() {
            if let Some((data, fetched_at)) = self.cache.read_if_valid()? {
                counter!("cache_hits_total").increment(1);
                let mut records = filter_news(data, category);
                records.truncate(page_size);
                return Ok(ServeOutcome {
                    records,
                    provenance: Provenance::Cache,
                    timestamp: fetched_at,
                    message: "News retrieved from cache".to_string(),
                });
            }
        }

        match self.fetch_fresh(category, page_size).await {
            Ok(batch) if !batch.is_empty() => {
                self.cache.put(batch.clone())?;
                tracing::info!(count = batch.len(), "refreshed news cache from upstream");
                let mut records = filter_news(batch, category);
                records.truncate(page_size);
                Ok(ServeOutcome {
                    records,
                    provenance: Provenance::Upstream,
                    timestamp: Utc::now(),
                    message: "Live news fetched successfully".to_string(),
                })
            }
            Ok(_) => {
                tracing::warn!("news batch normalized to nothing; serving sample articles");
                counter!("upstream_errors_total").increment(1);
                Ok(self.fallback_outcome(category, page_size))
            }
            Err(e) => {
                tracing::warn!(error = %e, "news fetch failed; serving sample articles");
                counter!("upstream_errors_total").increment(1);
                Ok(self.fallback_outcome(category, page_size))
            }
        }
    }

    async fn fetch_fresh(
        &self,
        category: Option<NewsCategory>,
        page_size: usize,
    ) -> Result<Vec<NewsArticle>, UpstreamError> {
        let query = self.rules.query_for(category);
        let raw = self.source.fetch_raw(query, page_size).await?;
        Ok(normalize_news_batch(&raw, &self.rules))
    }

    fn fallback_outcome(
        &self,
        category: Option<NewsCategory>,
        page_size: usize,
    ) -> ServeOutcome<NewsArticle> {
        counter!("fallback_served_total").increment(1);
        let mut records = filter_news(fallback::fallback_news(), category);
        records.truncate(page_size);
        ServeOutcome {
            records,
            provenance: Provenance::Fallback,
            timestamp: Utc::now(),
            message: "Using sample news - news feed unavailable".to_string(),
        }
    }
}
