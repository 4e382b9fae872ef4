//! Property-based tests for currency conversion.
//!
//! - Round half up correctness
//! - Determinism and monotonicity

use proptest::prelude::*;
use rust_decimal::Decimal;
use smokeduty_shared::MonetaryAmount;

use super::conversion::convert;

/// Strategy to generate foreign amounts in cents (0.00 to 1,000,000.00).
fn foreign_cents() -> impl Strategy<Value = i64> {
    0i64..100_000_000i64
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Integer rates turn a cent amount into a product with at most two
    /// decimals; the result must match integer round-half-up exactly.
    #[test]
    fn prop_matches_integer_half_up(
        cents in foreign_cents(),
        rate in 1i64..1_000i64,
    ) {
        let result = convert(Decimal::new(cents, 2), Decimal::from(rate)).unwrap();

        // floor((cents * rate + 50) / 100)
        let product = cents * rate;
        let expected = u64::try_from((product + 50) / 100).unwrap();
        prop_assert_eq!(result, MonetaryAmount::new(expected));
    }

    /// Exact .5 products always round up.
    #[test]
    fn prop_ties_round_up(whole in 0i64..1_000_000i64) {
        let amount = Decimal::new(whole * 10 + 5, 1);
        let result = convert(amount, Decimal::ONE).unwrap();
        prop_assert_eq!(result, MonetaryAmount::new(u64::try_from(whole + 1).unwrap()));
    }

    /// Conversion is deterministic.
    #[test]
    fn prop_convert_is_deterministic(
        cents in foreign_cents(),
        rate in positive_rate(),
    ) {
        let amount = Decimal::new(cents, 2);
        prop_assert_eq!(convert(amount, rate), convert(amount, rate));
    }

    /// A larger foreign amount never converts to a smaller local amount.
    #[test]
    fn prop_convert_is_monotonic(
        a in foreign_cents(),
        b in foreign_cents(),
        rate in positive_rate(),
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low = convert(Decimal::new(low, 2), rate).unwrap();
        let high = convert(Decimal::new(high, 2), rate).unwrap();
        prop_assert!(low <= high);
    }

    /// The rounded result is within half a unit of the exact product.
    #[test]
    fn prop_within_half_unit(
        cents in foreign_cents(),
        rate in positive_rate(),
    ) {
        let amount = Decimal::new(cents, 2);
        let result = convert(amount, rate).unwrap().as_decimal();
        let exact = amount * rate;
        prop_assert!((result - exact).abs() <= Decimal::new(5, 1));
    }
}
