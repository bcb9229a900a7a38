//! normalize.rs — converts loosely-typed upstream records into the canonical
//! schema. Records that fail validation are dropped silently; a rejection is
//! never an error for the batch.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::Value;

use crate::category::CategoryRules;
use crate::model::{NewsArticle, PriceRecord};

/// Name sentinel used by the registry for records without a commodity.
const UNKNOWN_NAME: &str = "Unknown";

/// Maximum excerpt length in characters, before the ellipsis marker.
const EXCERPT_CHARS: usize = 200;

/// Minimum lengths for a news record to be worth serving.
const MIN_TITLE_CHARS: usize = 10;
const MIN_CONTENT_CHARS: usize = 20;

/// Clean a text field coming from the news feed: decode HTML entities, strip
/// tags, collapse whitespace.
pub fn scrub_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

fn string_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}

/// Accepts JSON numbers and numeric strings; anything else is `None`.
fn numeric_field(raw: &Value, key: &str) -> Option<f64> {
    match raw.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Normalize one raw registry record, or reject it.
///
/// The registry is inconsistent about which field carries the commodity, so
/// the name falls back across known alternates before giving up. Rejected:
/// sentinel or too-short names, and non-positive or unparseable prices.
pub fn normalize_price_record(raw: &Value) -> Option<PriceRecord> {
    let name = string_field(raw, "commodity")
        .or_else(|| string_field(raw, "state"))
        .or_else(|| string_field(raw, "district"))
        .unwrap_or(UNKNOWN_NAME)
        .trim()
        .to_string();
    if name == UNKNOWN_NAME || name.chars().count() <= 2 {
        return None;
    }

    let price = numeric_field(raw, "price").or_else(|| numeric_field(raw, "min_price"))?;
    if !price.is_finite() || price <= 0.0 {
        return None;
    }

    Some(PriceRecord {
        name,
        price,
        region: string_field(raw, "state").unwrap_or_default().to_string(),
        subregion: string_field(raw, "district").unwrap_or_default().to_string(),
        market: string_field(raw, "market").unwrap_or_default().to_string(),
        date: string_field(raw, "date").unwrap_or_default().to_string(),
    })
}

/// Normalize a raw price batch and sort it by price, highest first. The sort
/// is stable, so equal prices keep their upstream order.
pub fn normalize_price_batch(raw: &[Value]) -> Vec<PriceRecord> {
    let mut out: Vec<PriceRecord> = raw
        .iter()
        .filter_map(|r| {
            let rec = normalize_price_record(r);
            if rec.is_none() {
                tracing::debug!(record = %r, "skipping invalid price record");
            }
            rec
        })
        .collect();
    out.sort_by(|a, b| b.price.partial_cmp(&a.price).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Derive the excerpt: first 200 characters, with an ellipsis only when the
/// content was actually cut.
fn excerpt_of(content: &str) -> String {
    if content.chars().count() <= EXCERPT_CHARS {
        return content.to_string();
    }
    let mut cut: String = content.chars().take(EXCERPT_CHARS).collect();
    cut.push_str("...");
    cut
}

/// Date portion of an ISO timestamp ("2025-11-02T06:30:00Z" -> "2025-11-02"),
/// falling back to today when the feed omits it.
fn article_date(raw: &Value) -> String {
    match string_field(raw, "publishedAt") {
        Some(ts) if !ts.trim().is_empty() => {
            ts.trim().split('T').next().unwrap_or(ts.trim()).to_string()
        }
        _ => chrono::Utc::now().format("%Y-%m-%d").to_string(),
    }
}

struct ArticleParts {
    title: String,
    content: String,
    date: String,
    source: String,
    url: String,
}

fn normalize_news_record(raw: &Value) -> Option<ArticleParts> {
    let title = scrub_text(string_field(raw, "title").unwrap_or_default());
    if title.chars().count() <= MIN_TITLE_CHARS {
        return None;
    }
    let content = scrub_text(string_field(raw, "description").unwrap_or_default());
    if content.chars().count() <= MIN_CONTENT_CHARS {
        return None;
    }
    let source = raw
        .get("source")
        .and_then(|s| s.get("name"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_NAME)
        .to_string();

    Some(ArticleParts {
        title,
        content,
        date: article_date(raw),
        source,
        url: string_field(raw, "url").unwrap_or_default().to_string(),
    })
}

/// Normalize a raw article batch: validate, classify, assign 1-based ids in
/// batch order, then sort by date descending (lexicographic on the ISO date;
/// the sort is stable so same-day articles keep their feed order).
pub fn normalize_news_batch(raw: &[Value], rules: &CategoryRules) -> Vec<NewsArticle> {
    let mut out: Vec<NewsArticle> = raw
        .iter()
        .filter_map(|r| {
            let parts = normalize_news_record(r);
            if parts.is_none() {
                tracing::debug!(record = %r, "skipping invalid news record");
            }
            parts
        })
        .enumerate()
        .map(|(i, parts)| {
            let category = rules.classify(&format!("{} {}", parts.title, parts.content));
            NewsArticle {
                id: i + 1,
                title: parts.title,
                excerpt: excerpt_of(&parts.content),
                content: parts.content,
                category,
                date: parts.date,
                source: parts.source,
                url: parts.url,
            }
        })
        .collect();
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
}
