//! Tax calculation error types.

use rust_decimal::Decimal;
use smokeduty_shared::AppError;
use thiserror::Error;

/// Input-validation failures; no partial breakdown is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxError {
    /// Stick count must be at least one.
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    /// Weight per stick must be positive.
    #[error("Weight per stick must be positive, got {0} g")]
    InvalidWeight(Decimal),

    /// A configured rate is outside its allowed range.
    #[error("Rate parameter {name} is out of range: {value}")]
    InvalidRateParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: Decimal,
    },

    /// An intermediate or final amount does not fit in a local-currency amount.
    #[error("Amount out of range while computing {0}")]
    AmountOutOfRange(&'static str),
}

impl From<TaxError> for AppError {
    fn from(err: TaxError) -> Self {
        Self::Validation(err.to_string())
    }
}
