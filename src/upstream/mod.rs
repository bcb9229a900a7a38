//! upstream — clients for the two external collaborators, behind trait seams
//! so the orchestrator can be exercised with fixture sources in tests.

pub mod newsfeed;
pub mod registry;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Network timeout for a primary fetch.
pub const PRIMARY_TIMEOUT: Duration = Duration::from_secs(30);
/// Tighter timeout for each partition call of the diverse-fetch sweep.
pub const PARTITION_TIMEOUT: Duration = Duration::from_secs(15);

/// Failure classes for an upstream call. `Transport` covers network errors,
/// timeouts and non-success HTTP statuses; `Api` is an error the upstream
/// embedded in an otherwise well-formed response body.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream reported an error: {0}")]
    Api(String),
    #[error("unexpected upstream payload: {0}")]
    Payload(String),
}

/// One scoped query against the price registry.
#[derive(Debug, Clone)]
pub struct PriceQuery {
    pub limit: usize,
    pub offset: usize,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub commodity: Option<String>,
    pub timeout: Duration,
}

impl Default for PriceQuery {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            region: None,
            subregion: None,
            commodity: None,
            timeout: PRIMARY_TIMEOUT,
        }
    }
}

/// A source of raw (pre-normalization) price records.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_raw(&self, query: &PriceQuery) -> Result<Vec<Value>, UpstreamError>;
}

/// A source of raw news articles for a query string.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_raw(&self, query: &str, page_size: usize) -> Result<Vec<Value>, UpstreamError>;
}
