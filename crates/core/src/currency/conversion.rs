//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for local-currency amounts:
//! - Always round to whole local-currency units
//! - Use round half up (ties away from zero), NOT banker's rounding
//! - Every computed field is rounded on its own, never derived by subtraction

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use smokeduty_shared::MonetaryAmount;

use super::error::CurrencyError;

/// Rounds a value to a whole unit, ties away from zero (0.5 -> 1, 2.5 -> 3).
#[must_use]
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a non-negative value and turns it into a whole local-currency amount.
///
/// Returns `None` for negative values or values beyond the representable range.
#[must_use]
pub fn to_amount(value: Decimal) -> Option<MonetaryAmount> {
    MonetaryAmount::from_decimal(round_half_up(value))
}

/// Converts a foreign-currency amount into whole local-currency units.
///
/// `rate` is the number of local units per one foreign unit.
pub fn convert(amount: Decimal, rate: Decimal) -> Result<MonetaryAmount, CurrencyError> {
    if rate <= Decimal::ZERO {
        return Err(CurrencyError::InvalidRate(rate));
    }
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CurrencyError::InvalidAmount(amount));
    }

    amount
        .checked_mul(rate)
        .and_then(to_amount)
        .ok_or(CurrencyError::OutOfRange { amount, rate })
}
