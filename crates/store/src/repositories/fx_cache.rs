//! Daily exchange rate cache.
//!
//! One JSON file holds the rates fetched on a single calendar day:
//!
//! ```json
//! { "date": "2025-03-14", "rates": { "USD->JPY": "149.87" } }
//! ```
//!
//! Writing a rate for a new day discards the previous day's entries.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smokeduty_shared::CurrencyCode;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StoreError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    rates: BTreeMap<String, Decimal>,
}

fn pair_key(from: &CurrencyCode, to: &CurrencyCode) -> String {
    format!("{from}->{to}")
}

/// File-backed cache of exchange rates keyed by currency pair and date.
///
/// Reads and writes are serialized through an async mutex so concurrent
/// requests never interleave a read-modify-write of the file.
#[derive(Debug)]
pub struct FxCacheRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FxCacheRepository {
    /// Creates a cache stored at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached rate for the pair on `date`, if any.
    ///
    /// A missing or unreadable cache file is treated as empty.
    pub async fn get(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        date: NaiveDate,
    ) -> Option<Decimal> {
        let _guard = self.lock.lock().await;
        let cache = self.read().await;

        if cache.date != Some(date) {
            return None;
        }
        cache.rates.get(&pair_key(from, to)).copied()
    }

    /// Stores the rate for the pair on `date`.
    pub async fn put(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        date: NaiveDate,
        rate: Decimal,
    ) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut cache = self.read().await;

        if cache.date != Some(date) {
            cache.rates.clear();
            cache.date = Some(date);
        }
        cache.rates.insert(pair_key(from, to), rate);

        self.write(&cache).await?;
        debug!(pair = %pair_key(from, to), %date, %rate, "Cached exchange rate");
        Ok(())
    }

    async fn read(&self) -> CacheFile {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return CacheFile::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable rate cache, ignoring");
                return CacheFile::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Corrupt rate cache, ignoring");
            CacheFile::default()
        })
    }

    async fn write(&self, cache: &CacheFile) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(cache)?;
        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, body)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }
}
