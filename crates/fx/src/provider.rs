//! Live exchange rate providers.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use smokeduty_shared::CurrencyCode;
use tracing::debug;

use crate::error::FxError;

/// A source of current exchange rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Name reported as the rate source for live fetches.
    fn name(&self) -> &'static str;

    /// Fetches how many `to` units one `from` unit buys today.
    async fn fetch(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<Decimal, FxError>;
}

/// `GET /latest?from=USD&to=JPY` response body.
#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: HashMap<String, serde_json::Number>,
}

/// Client for the Frankfurter API (free, no API key).
#[derive(Debug, Clone)]
pub struct FrankfurterProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterProvider {
    /// Creates a provider for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FxError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

/// Parses a JSON number through its textual form, never through `f64` arithmetic.
fn parse_rate(number: &serde_json::Number) -> Result<Decimal, FxError> {
    let text = number.to_string();
    let rate = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| FxError::InvalidProviderRate(text.clone()))?;

    if rate <= Decimal::ZERO {
        return Err(FxError::InvalidProviderRate(text));
    }
    Ok(rate)
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    fn name(&self) -> &'static str {
        "frankfurter"
    }

    async fn fetch(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<Decimal, FxError> {
        let url = format!("{}/latest", self.base_url);
        debug!(%url, %from, %to, "Fetching exchange rate");

        let body: LatestResponse = self
            .client
            .get(&url)
            .query(&[("from", from.as_str()), ("to", to.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let number = body
            .rates
            .get(to.as_str())
            .ok_or_else(|| FxError::MissingRate(to.to_string()))?;
        parse_rate(number)
    }
}
