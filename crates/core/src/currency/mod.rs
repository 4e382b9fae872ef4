//! Foreign-to-local currency conversion and exchange rate types.

pub mod conversion;
pub mod error;
pub mod exchange;

#[cfg(test)]
mod props;

pub use conversion::{convert, round_half_up};
pub use error::CurrencyError;
pub use exchange::{ExchangeRate, RateSource};
