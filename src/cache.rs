//! cache.rs — per-domain in-memory cache entry with a fixed validity window.
//!
//! Each domain (prices, news) owns exactly one `CacheStore`. The entry is
//! replaced wholesale on every successful refresh; there is no per-key
//! eviction and nothing survives a process restart. The `Mutex` makes a
//! concurrent `put` atomic with respect to readers, so concurrent refreshes
//! cannot interleave a half-written entry.

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone)]
struct Entry<T> {
    data: Vec<T>,
    fetched_at: DateTime<Utc>,
}

/// Snapshot of cache state for the diagnostics endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub populated: bool,
    pub valid: bool,
    pub entries: usize,
    pub fetched_at: Option<DateTime<Utc>>,
    pub window_secs: i64,
}

#[derive(Debug)]
pub struct CacheStore<T> {
    window: Duration,
    entry: Mutex<Option<Entry<T>>>,
}

impl<T: Clone> CacheStore<T> {
    pub fn new(window_secs: i64) -> Self {
        Self {
            window: Duration::seconds(window_secs),
            entry: Mutex::new(None),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Entry<T>>>> {
        self.entry.lock().map_err(|_| anyhow!("cache mutex poisoned"))
    }

    /// Overwrite the entry with a fresh batch, stamped now.
    pub fn put(&self, data: Vec<T>) -> Result<()> {
        self.put_at(data, Utc::now())
    }

    fn put_at(&self, data: Vec<T>, fetched_at: DateTime<Utc>) -> Result<()> {
        let mut guard = self.lock()?;
        *guard = Some(Entry { data, fetched_at });
        Ok(())
    }

    /// An entry is valid iff data is present and younger than the window.
    pub fn is_valid(&self) -> Result<bool> {
        self.is_valid_at(Utc::now())
    }

    fn is_valid_at(&self, now: DateTime<Utc>) -> Result<bool> {
        let guard = self.lock()?;
        Ok(match guard.as_ref() {
            None => false,
            Some(entry) => now - entry.fetched_at < self.window,
        })
    }

    /// Returns the cached batch and its fetch timestamp when still valid.
    pub fn read_if_valid(&self) -> Result<Option<(Vec<T>, DateTime<Utc>)>> {
        let now = Utc::now();
        let guard = self.lock()?;
        Ok(guard.as_ref().and_then(|entry| {
            if now - entry.fetched_at < self.window {
                Some((entry.data.clone(), entry.fetched_at))
            } else {
                None
            }
        }))
    }

    pub fn stats(&self) -> Result<CacheStats> {
        let now = Utc::now();
        let guard = self.lock()?;
        Ok(match guard.as_ref() {
            None => CacheStats {
                populated: false,
                valid: false,
                entries: 0,
                fetched_at: None,
                window_secs: self.window.num_seconds(),
            },
            Some(entry) => CacheStats {
                populated: true,
                valid: now - entry.fetched_at < self.window,
                entries: entry.data.len(),
                fetched_at: Some(entry.fetched_at),
                window_secs: self.window.num_seconds(),
            },
        })
    }
}
