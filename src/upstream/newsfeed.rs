//! newsfeed.rs — client for the news feed's keyword search endpoint.
//!
//! The feed takes a free-text query (built from the category rule table),
//! language, sort order and page size, and answers with a `status` envelope:
//! `"ok"` with articles, or `"error"` with a message.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{NewsSource, UpstreamError, PRIMARY_TIMEOUT};

#[derive(Debug, Clone)]
pub struct NewsFeedClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsFeedClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Option<Vec<Value>>,
}

impl FeedResponse {
    fn into_articles(self) -> Result<Vec<Value>, UpstreamError> {
        match self.status.as_deref() {
            Some(s) if s.eq_ignore_ascii_case("ok") => self.articles.ok_or_else(|| {
                UpstreamError::Payload("feed response without articles".to_string())
            }),
            Some(_) => Err(UpstreamError::Api(
                self.message.unwrap_or_else(|| "news feed error".to_string()),
            )),
            None => Err(UpstreamError::Payload(
                "feed response without status".to_string(),
            )),
        }
    }
}

#[async_trait]
impl NewsSource for NewsFeedClient {
    async fn fetch_raw(&self, query: &str, page_size: usize) -> Result<Vec<Value>, UpstreamError> {
        let page_size = page_size.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .timeout(PRIMARY_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let body: FeedResponse = resp.json().await?;
        let articles = body.into_articles()?;
        tracing::debug!(count = articles.len(), "news feed returned articles");
        Ok(articles)
    }
}
