//! model.rs — canonical record shapes shared by every source (upstream, cache,
//! fallback), plus the filter spec applied uniformly to all of them.
//!
//! All upstream payloads are converted into these types before any filtering
//! happens, so the query layer never sees a raw registry or feed record.

use serde::{Deserialize, Serialize};

/// One normalized commodity price quote.
///
/// Invariants (enforced by the normalizer, assumed everywhere else):
/// `price > 0` and `name` is longer than 2 characters after trimming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub name: String,
    pub price: f64,
    pub region: String,
    pub subregion: String,
    pub market: String,
    pub date: String,
}

/// Fixed category set for news articles. The keyword table that maps text to
/// a category is configurable (see `category.rs`); the set itself is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Policy,
    Market,
    Weather,
    Technology,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Policy => "policy",
            NewsCategory::Market => "market",
            NewsCategory::Weather => "weather",
            NewsCategory::Technology => "technology",
        }
    }

    /// Case-insensitive parse; `None` for anything outside the fixed set
    /// (including "all", which callers treat as "no category filter").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "policy" => Some(NewsCategory::Policy),
            "market" => Some(NewsCategory::Market),
            "weather" => Some(NewsCategory::Weather),
            "technology" => Some(NewsCategory::Technology),
            _ => None,
        }
    }
}

impl std::fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized news article. `id` is the 1-based position within the batch
/// it was normalized in; it is not stable across refreshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: usize,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: NewsCategory,
    pub date: String,
    pub source: String,
    pub url: String,
}

/// Where a response's records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Cache,
    Upstream,
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Cache => "cache",
            Provenance::Upstream => "upstream",
            Provenance::Fallback => "fallback",
        }
    }
}

/// Optional equality filters for price queries. Matching is case-insensitive
/// exact match per field, AND across the fields that are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub commodity: Option<String>,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.subregion.is_none() && self.commodity.is_none()
    }

    pub fn matches(&self, record: &PriceRecord) -> bool {
        field_matches(self.region.as_deref(), &record.region)
            && field_matches(self.subregion.as_deref(), &record.subregion)
            && field_matches(self.commodity.as_deref(), &record.name)
    }

    /// Keep matching records. Ordering of the input batch is preserved;
    /// filtering never re-sorts.
    pub fn apply(&self, records: Vec<PriceRecord>) -> Vec<PriceRecord> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

fn field_matches(wanted: Option<&str>, actual: &str) -> bool {
    match wanted {
        None => true,
        Some(w) => actual.eq_ignore_ascii_case(w),
    }
}

/// Category filter for news batches; `None` means "all". Preserves ordering.
pub fn filter_news(articles: Vec<NewsArticle>, category: Option<NewsCategory>) -> Vec<NewsArticle> {
    match category {
        None => articles,
        Some(c) => articles.into_iter().filter(|a| a.category == c).collect(),
    }
}
