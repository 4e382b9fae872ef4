//! Exchange rate lookup error types.

use rust_decimal::Decimal;
use smokeduty_shared::AppError;
use thiserror::Error;

/// Errors raised by rate providers and the lookup service.
#[derive(Debug, Error)]
pub enum FxError {
    /// HTTP request failed, timed out, or returned an error status.
    #[error("Rate provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered without a rate for the requested currency.
    #[error("Rate provider returned no rate for {0}")]
    MissingRate(String),

    /// Provider returned something that is not a positive decimal.
    #[error("Rate provider returned an invalid rate: {0}")]
    InvalidProviderRate(String),

    /// A user-entered rate is zero or negative.
    #[error("Exchange rate must be positive, got {0}")]
    NonPositiveRate(Decimal),
}

impl From<FxError> for AppError {
    fn from(err: FxError) -> Self {
        match err {
            FxError::NonPositiveRate(_) => Self::Validation(err.to_string()),
            _ => Self::ExternalService(err.to_string()),
        }
    }
}
