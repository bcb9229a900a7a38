//! fetch.rs — fetch strategies for the price registry.
//!
//! An unfiltered query would otherwise return whatever partition the registry
//! happens to page out first, so the diverse sweep issues one scoped query per
//! representative region and merges the results. Any filter routes to a
//! single scoped query instead.

use metrics::counter;
use serde_json::Value;

use crate::model::FilterSpec;
use crate::upstream::{PriceQuery, PriceSource, UpstreamError, PARTITION_TIMEOUT, PRIMARY_TIMEOUT};

/// Fixed, ordered partition keys for the diverse sweep.
pub const DIVERSE_REGIONS: [&str; 8] = [
    "Punjab",
    "Haryana",
    "Uttar Pradesh",
    "Madhya Pradesh",
    "Gujarat",
    "Rajasthan",
    "Maharashtra",
    "Karnataka",
];

/// Scoped queries are clamped to what the registry will page out.
const MIN_SCOPED_LIMIT: usize = 1;
const MAX_SCOPED_LIMIT: usize = 1000;

/// Records requested per partition: an even split of the total, floored at 5
/// so small totals still sample every partition meaningfully.
pub fn partition_cap(total_limit: usize, partitions: usize) -> usize {
    (total_limit / partitions.max(1)).max(5)
}

/// Sweep the fixed region list, skipping partitions that fail or come back
/// empty. A single bad partition never aborts the sweep. Only when every
/// partition yields nothing is one unscoped rescue query attempted; its error
/// is the only error this function propagates.
pub async fn fetch_diverse(
    source: &dyn PriceSource,
    regions: &[&str],
    total_limit: usize,
) -> Result<Vec<Value>, UpstreamError> {
    let cap = partition_cap(total_limit, regions.len());
    let mut merged = Vec::new();

    for region in regions {
        let query = PriceQuery {
            limit: cap,
            region: Some((*region).to_string()),
            timeout: PARTITION_TIMEOUT,
            ..Default::default()
        };
        match source.fetch_raw(&query).await {
            Ok(batch) if !batch.is_empty() => merged.extend(batch),
            Ok(_) => tracing::debug!(region, "partition returned no records"),
            Err(e) => {
                tracing::warn!(region, error = %e, "partition fetch failed; continuing");
                counter!("upstream_partition_errors_total").increment(1);
            }
        }
    }

    if merged.is_empty() {
        tracing::warn!("all partitions empty; falling back to one unscoped query");
        let query = PriceQuery {
            limit: total_limit,
            timeout: PRIMARY_TIMEOUT,
            ..Default::default()
        };
        merged = source.fetch_raw(&query).await?;
    }

    merged.truncate(total_limit);
    Ok(merged)
}

/// Single scoped query with the caller's filters forwarded verbatim.
pub async fn fetch_scoped(
    source: &dyn PriceSource,
    filters: &FilterSpec,
    limit: usize,
) -> Result<Vec<Value>, UpstreamError> {
    let query = PriceQuery {
        limit: limit.clamp(MIN_SCOPED_LIMIT, MAX_SCOPED_LIMIT),
        region: filters.region.clone(),
        subregion: filters.subregion.clone(),
        commodity: filters.commodity.clone(),
        timeout: PRIMARY_TIMEOUT,
        ..Default::default()
    };
    source.fetch_raw(&query).await
}
