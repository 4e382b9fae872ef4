//! Exchange rate types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use smokeduty_shared::CurrencyCode;

/// Where an exchange rate came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateSource {
    /// Today's rate, read back from the local daily cache.
    Cache,
    /// Fetched live from the named provider.
    Live(String),
    /// Entered by the user and used instead of any lookup.
    Manual,
    /// Entered by the user and used because the lookup was unavailable.
    ManualFallback,
    /// Source and target currency are the same.
    Identity,
}

impl RateSource {
    /// Returns the source tag reported to callers.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cache => "cache",
            Self::Live(provider) => provider,
            Self::Manual => "manual",
            Self::ManualFallback => "manual_fallback",
            Self::Identity => "identity",
        }
    }
}

impl std::fmt::Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RateSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Exchange rate between two currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeRate {
    /// Source currency code.
    pub from_currency: CurrencyCode,
    /// Target currency code.
    pub to_currency: CurrencyCode,
    /// Exchange rate (1 from_currency = rate to_currency).
    pub rate: Decimal,
    /// Day the rate is valid for; `None` for user-entered rates.
    pub effective_date: Option<NaiveDate>,
    /// How the rate was obtained.
    pub source: RateSource,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub const fn new(
        from_currency: CurrencyCode,
        to_currency: CurrencyCode,
        rate: Decimal,
        effective_date: Option<NaiveDate>,
        source: RateSource,
    ) -> Self {
        Self {
            from_currency,
            to_currency,
            rate,
            effective_date,
            source,
        }
    }
}
