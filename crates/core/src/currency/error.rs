//! Currency conversion error types.

use rust_decimal::Decimal;
use smokeduty_shared::AppError;
use thiserror::Error;

/// Errors that can occur while converting a foreign amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// Exchange rate must be strictly positive.
    #[error("Exchange rate must be positive, got {0}")]
    InvalidRate(Decimal),

    /// Foreign amount cannot be negative.
    #[error("Amount cannot be negative, got {0}")]
    InvalidAmount(Decimal),

    /// Converted amount does not fit in a local-currency amount.
    #[error("Converted amount out of range: {amount} x {rate}")]
    OutOfRange {
        /// Foreign amount.
        amount: Decimal,
        /// Exchange rate.
        rate: Decimal,
    },
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        Self::Validation(err.to_string())
    }
}
