//! registry.rs — client for the government commodity-price registry.
//!
//! The registry speaks a resource API: api-key + limit/offset paging plus
//! `filters[...]` equality parameters keyed by ITS field names (state,
//! district, commodity). Responses can carry an embedded error status even
//! when the HTTP exchange succeeds, which must be surfaced as a semantic
//! error rather than a payload full of nothing.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{PriceQuery, PriceSource, UpstreamError};

#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegistryResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    records: Option<Vec<Value>>,
}

impl RegistryResponse {
    fn into_records(self) -> Result<Vec<Value>, UpstreamError> {
        if let Some(status) = self.status.as_deref() {
            if status.eq_ignore_ascii_case("error") {
                return Err(UpstreamError::Api(
                    self.message.unwrap_or_else(|| "registry error".to_string()),
                ));
            }
        }
        self.records
            .ok_or_else(|| UpstreamError::Payload("registry response without records".to_string()))
    }
}

#[async_trait]
impl PriceSource for RegistryClient {
    async fn fetch_raw(&self, query: &PriceQuery) -> Result<Vec<Value>, UpstreamError> {
        let limit = query.limit.to_string();
        let offset = query.offset.to_string();
        let mut req = self.client.get(&self.base_url).query(&[
            ("api-key", self.api_key.as_str()),
            ("format", "json"),
            ("limit", limit.as_str()),
            ("offset", offset.as_str()),
        ]);
        if let Some(region) = &query.region {
            req = req.query(&[("filters[state]", region.as_str())]);
        }
        if let Some(subregion) = &query.subregion {
            req = req.query(&[("filters[district]", subregion.as_str())]);
        }
        if let Some(commodity) = &query.commodity {
            req = req.query(&[("filters[commodity]", commodity.as_str())]);
        }

        let resp = req.timeout(query.timeout).send().await?.error_for_status()?;
        let body: RegistryResponse = resp.json().await?;
        let records = body.into_records()?;
        tracing::debug!(count = records.len(), "registry returned records");
        Ok(records)
    }
}
