//! Exchange rate lookup service.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use rust_decimal::Decimal;
use smokeduty_core::currency::{ExchangeRate, RateSource};
use smokeduty_shared::CurrencyCode;
use smokeduty_store::FxCacheRepository;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::FxError;
use crate::provider::RateProvider;

/// Outcome of a rate lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLookup {
    /// A usable rate.
    Found(ExchangeRate),
    /// No rate could be obtained; the caller should ask for one manually.
    Unavailable,
}

impl RateLookup {
    /// Returns the rate if one was found.
    #[must_use]
    pub const fn rate(&self) -> Option<&ExchangeRate> {
        match self {
            Self::Found(rate) => Some(rate),
            Self::Unavailable => None,
        }
    }
}

/// Looks up exchange rates through the daily cache and a live provider.
pub struct RateLookupService {
    provider: Arc<dyn RateProvider>,
    cache: Arc<FxCacheRepository>,
    fetch_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for RateLookupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLookupService")
            .field("provider", &self.provider.name())
            .field("cache", &self.cache.path())
            .finish_non_exhaustive()
    }
}

impl RateLookupService {
    /// Creates a new lookup service.
    #[must_use]
    pub fn new(provider: Arc<dyn RateProvider>, cache: Arc<FxCacheRepository>) -> Self {
        Self {
            provider,
            cache,
            fetch_locks: DashMap::new(),
        }
    }

    /// Returns today's rate for the pair.
    ///
    /// A cached rate for `today` is returned without contacting the
    /// provider. Otherwise the provider is asked once and the answer is
    /// cached. Provider failures are logged and reported as
    /// [`RateLookup::Unavailable`].
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn lookup(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        today: NaiveDate,
    ) -> RateLookup {
        if from == to {
            return RateLookup::Found(ExchangeRate::new(
                from.clone(),
                to.clone(),
                Decimal::ONE,
                Some(today),
                RateSource::Identity,
            ));
        }

        if let Some(rate) = self.cache.get(from, to, today).await {
            debug!(%rate, "Rate cache hit");
            return Self::cached(from, to, rate, today);
        }

        // Concurrent misses for the same pair wait here and re-check the cache.
        let pair_lock = self.pair_lock(from, to);
        let _guard = pair_lock.lock().await;
        if let Some(rate) = self.cache.get(from, to, today).await {
            debug!(%rate, "Rate cached while waiting");
            return Self::cached(from, to, rate, today);
        }

        let rate = match self.provider.fetch(from, to).await {
            Ok(rate) => rate,
            Err(e) => {
                warn!(error = %e, "Exchange rate unavailable");
                return RateLookup::Unavailable;
            }
        };

        if let Err(e) = self.cache.put(from, to, today, rate).await {
            warn!(error = %e, "Failed to cache exchange rate");
        }
        info!(%rate, "Fetched exchange rate");

        RateLookup::Found(ExchangeRate::new(
            from.clone(),
            to.clone(),
            rate,
            Some(today),
            RateSource::Live(self.provider.name().to_string()),
        ))
    }

    /// Resolves the rate to use for a calculation.
    ///
    /// A manual rate always wins. Otherwise the rate is looked up, and a
    /// fallback rate is used only when the lookup is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::NonPositiveRate`] if the manual rate, or a
    /// fallback rate that ends up being used, is not positive.
    pub async fn resolve(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        manual: Option<Decimal>,
        fallback: Option<Decimal>,
        today: NaiveDate,
    ) -> Result<RateLookup, FxError> {
        if let Some(rate) = manual {
            let rate = positive(rate)?;
            debug!(%from, %to, %rate, "Using manual exchange rate");
            return Ok(RateLookup::Found(ExchangeRate::new(
                from.clone(),
                to.clone(),
                rate,
                None,
                RateSource::Manual,
            )));
        }

        match (self.lookup(from, to, today).await, fallback) {
            (RateLookup::Unavailable, Some(rate)) => {
                let rate = positive(rate)?;
                info!(%from, %to, %rate, "Using fallback exchange rate");
                Ok(RateLookup::Found(ExchangeRate::new(
                    from.clone(),
                    to.clone(),
                    rate,
                    None,
                    RateSource::ManualFallback,
                )))
            }
            (lookup, _) => Ok(lookup),
        }
    }

    fn pair_lock(&self, from: &CurrencyCode, to: &CurrencyCode) -> Arc<Mutex<()>> {
        Arc::clone(
            self.fetch_locks
                .entry(format!("{from}->{to}"))
                .or_default()
                .value(),
        )
    }

    fn cached(from: &CurrencyCode, to: &CurrencyCode, rate: Decimal, today: NaiveDate) -> RateLookup {
        RateLookup::Found(ExchangeRate::new(
            from.clone(),
            to.clone(),
            rate,
            Some(today),
            RateSource::Cache,
        ))
    }
}

fn positive(rate: Decimal) -> Result<Decimal, FxError> {
    if rate <= Decimal::ZERO {
        return Err(FxError::NonPositiveRate(rate));
    }
    Ok(rate)
}
