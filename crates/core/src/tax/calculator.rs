//! Duty, excise and consumption tax calculation.
//!
//! Steps run in a fixed order and every monetary field is rounded half up on
//! its own. Totals are sums of already-rounded fields, so
//! `grand_total == purchase_total + duty + excise + consumption + fee` holds
//! exactly.

use rust_decimal::Decimal;
use smokeduty_shared::MonetaryAmount;

use super::error::TaxError;
use super::params::{ConsumptionTaxBase, ConsumptionTaxRates, ExcisePolicy, RateParameters};
use super::types::{CalculationInput, ConsumptionTaxAmount, TaxBreakdown};
use crate::currency::conversion::to_amount;

const GRAMS_PER_KILOGRAM: u32 = 1000;
const EQUIVALENTS_PER_RATE_UNIT: u32 = 1000;

/// Stateless tax engine for personal tobacco imports.
pub struct TaxCalculator;

impl TaxCalculator {
    /// Computes the full breakdown for one shipment.
    ///
    /// All inputs are validated before any arithmetic; a rejected input
    /// produces no partial result.
    pub fn calculate(
        input: &CalculationInput,
        params: &RateParameters,
    ) -> Result<TaxBreakdown, TaxError> {
        if input.sticks <= 0 {
            return Err(TaxError::InvalidQuantity(input.sticks));
        }
        if input.weight_per_stick_grams <= Decimal::ZERO {
            return Err(TaxError::InvalidWeight(input.weight_per_stick_grams));
        }
        params.validate()?;

        let sticks = Decimal::from(input.sticks);

        let purchase_total = add(input.item_price, input.shipping, "purchase_total")?;

        let assessed_value = round(
            purchase_total.as_decimal() * params.assessed_ratio,
            "assessed_value",
        )?;
        let exempt = assessed_value <= params.exemption_threshold;

        let duty = if exempt {
            MonetaryAmount::ZERO
        } else {
            round(assessed_value.as_decimal() * params.duty_rate, "duty")?
        };

        let total_weight_grams = checked_mul(sticks, input.weight_per_stick_grams, "weight")?;
        let (excise_tax, cigarette_equivalents) = Self::excise(
            params.excise,
            sticks,
            input.weight_per_stick_grams,
            total_weight_grams,
        )?;

        let consumption_tax = if exempt {
            Self::zero_consumption(params.consumption_tax)
        } else {
            let base = match params.consumption_tax_base {
                ConsumptionTaxBase::AssessedValue => assessed_value,
                ConsumptionTaxBase::AssessedValuePlusDuty => {
                    add(assessed_value, duty, "consumption_tax_base")?
                }
            };
            Self::consumption(params.consumption_tax, base)?
        };

        let consumption_total = consumption_tax
            .total()
            .ok_or(TaxError::AmountOutOfRange("consumption_tax"))?;

        let taxes_and_fees_total = [duty, excise_tax, consumption_total, params.fixed_fee]
        .into_iter()
        .try_fold(MonetaryAmount::ZERO, |acc, part| {
            add(acc, part, "taxes_and_fees_total")
        })?;
        let grand_total = add(purchase_total, taxes_and_fees_total, "grand_total")?;
        let per_unit = round(grand_total.as_decimal() / sticks, "per_unit")?;

        Ok(TaxBreakdown {
            item_price: input.item_price,
            shipping: input.shipping,
            purchase_total,
            assessed_value,
            duty_and_consumption_tax_exempt: exempt,
            duty,
            excise_tax,
            consumption_tax,
            customs_fee: params.fixed_fee,
            total_weight_grams,
            cigarette_equivalents,
            excise_policy: params.excise,
            consumption_tax_base: params.consumption_tax_base,
            taxes_and_fees_total,
            grand_total,
            per_unit,
        })
    }

    /// Excise tax, independent of the exemption test.
    fn excise(
        policy: ExcisePolicy,
        sticks: Decimal,
        weight_per_stick_grams: Decimal,
        total_weight_grams: Decimal,
    ) -> Result<(MonetaryAmount, Option<Decimal>), TaxError> {
        match policy {
            ExcisePolicy::PerKilogram { rate_per_kg } => {
                let kilograms = total_weight_grams / Decimal::from(GRAMS_PER_KILOGRAM);
                let tax = round(checked_mul(kilograms, rate_per_kg, "excise")?, "excise")?;
                Ok((tax, None))
            }
            ExcisePolicy::CigaretteEquivalence { rate_per_thousand } => {
                // sticks under one gram still count as a full cigarette
                let per_stick = weight_per_stick_grams.max(Decimal::ONE);
                let equivalents = checked_mul(sticks, per_stick, "cigarette_equivalents")?;
                let thousands = equivalents / Decimal::from(EQUIVALENTS_PER_RATE_UNIT);
                let tax = round(checked_mul(thousands, rate_per_thousand, "excise")?, "excise")?;
                Ok((tax, Some(equivalents)))
            }
        }
    }

    /// Consumption tax on `base`; split portions are rounded independently.
    fn consumption(
        rates: ConsumptionTaxRates,
        base: MonetaryAmount,
    ) -> Result<ConsumptionTaxAmount, TaxError> {
        let base = base.as_decimal();
        Ok(match rates {
            ConsumptionTaxRates::Single { rate } => ConsumptionTaxAmount::Single {
                amount: round(base * rate, "consumption_tax")?,
            },
            ConsumptionTaxRates::Split {
                national_rate,
                local_rate,
            } => ConsumptionTaxAmount::Split {
                national: round(base * national_rate, "consumption_tax_national")?,
                local: round(base * local_rate, "consumption_tax_local")?,
            },
        })
    }

    fn zero_consumption(rates: ConsumptionTaxRates) -> ConsumptionTaxAmount {
        match rates {
            ConsumptionTaxRates::Single { .. } => ConsumptionTaxAmount::Single {
                amount: MonetaryAmount::ZERO,
            },
            ConsumptionTaxRates::Split { .. } => ConsumptionTaxAmount::Split {
                national: MonetaryAmount::ZERO,
                local: MonetaryAmount::ZERO,
            },
        }
    }
}

fn round(value: Decimal, field: &'static str) -> Result<MonetaryAmount, TaxError> {
    to_amount(value).ok_or(TaxError::AmountOutOfRange(field))
}

fn add(
    a: MonetaryAmount,
    b: MonetaryAmount,
    field: &'static str,
) -> Result<MonetaryAmount, TaxError> {
    a.checked_add(b).ok_or(TaxError::AmountOutOfRange(field))
}

fn checked_mul(a: Decimal, b: Decimal, field: &'static str) -> Result<Decimal, TaxError> {
    a.checked_mul(b).ok_or(TaxError::AmountOutOfRange(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn split_params() -> RateParameters {
        RateParameters {
            duty_rate: dec!(0.16),
            consumption_tax: ConsumptionTaxRates::Split {
                national_rate: dec!(0.078),
                local_rate: dec!(0.022),
            },
            consumption_tax_base: ConsumptionTaxBase::AssessedValuePlusDuty,
            excise: ExcisePolicy::PerKilogram {
                rate_per_kg: dec!(15244),
            },
            assessed_ratio: dec!(0.6),
            exemption_threshold: MonetaryAmount::new(10_000),
            fixed_fee: MonetaryAmount::new(200),
        }
    }

    fn input(sticks: i64, weight: Decimal, item_price: u64) -> CalculationInput {
        CalculationInput {
            sticks,
            weight_per_stick_grams: weight,
            item_price: MonetaryAmount::new(item_price),
            shipping: MonetaryAmount::ZERO,
        }
    }

    #[test]
    fn test_exempt_small_order() {
        let b = TaxCalculator::calculate(&input(20, dec!(1.0), 1000), &split_params()).unwrap();

        assert_eq!(b.purchase_total, MonetaryAmount::new(1000));
        assert_eq!(b.assessed_value, MonetaryAmount::new(600));
        assert!(b.duty_and_consumption_tax_exempt);
        assert_eq!(b.duty, MonetaryAmount::ZERO);
        assert_eq!(b.total_weight_grams, dec!(20.0));
        assert_eq!(b.excise_tax, MonetaryAmount::new(305));
        assert_eq!(
            b.consumption_tax,
            ConsumptionTaxAmount::Split {
                national: MonetaryAmount::ZERO,
                local: MonetaryAmount::ZERO
            }
        );
        assert_eq!(b.customs_fee, MonetaryAmount::new(200));
        assert_eq!(b.taxes_and_fees_total, MonetaryAmount::new(505));
        assert_eq!(b.grand_total, MonetaryAmount::new(1505));
        assert_eq!(b.per_unit, MonetaryAmount::new(75));
        assert_eq!(b.cigarette_equivalents, None);
    }

    #[test]
    fn test_taxable_order_base_includes_duty() {
        let b = TaxCalculator::calculate(&input(20, dec!(1.0), 50_000), &split_params()).unwrap();

        assert_eq!(b.assessed_value, MonetaryAmount::new(30_000));
        assert!(!b.duty_and_consumption_tax_exempt);
        assert_eq!(b.duty, MonetaryAmount::new(4800));
        assert_eq!(
            b.consumption_tax,
            ConsumptionTaxAmount::Split {
                national: MonetaryAmount::new(2714),
                local: MonetaryAmount::new(766)
            }
        );
        assert_eq!(b.excise_tax, MonetaryAmount::new(305));
        assert_eq!(b.taxes_and_fees_total, MonetaryAmount::new(8785));
        assert_eq!(b.grand_total, MonetaryAmount::new(58_785));
        assert_eq!(b.per_unit, MonetaryAmount::new(2939));
    }

    #[test]
    fn test_taxable_order_base_excludes_duty() {
        let mut params = split_params();
        params.consumption_tax_base = ConsumptionTaxBase::AssessedValue;
        let b = TaxCalculator::calculate(&input(20, dec!(1.0), 50_000), &params).unwrap();

        // 30000 * 0.078 = 2340, 30000 * 0.022 = 660
        assert_eq!(
            b.consumption_tax,
            ConsumptionTaxAmount::Split {
                national: MonetaryAmount::new(2340),
                local: MonetaryAmount::new(660)
            }
        );
        assert_eq!(b.taxes_and_fees_total, MonetaryAmount::new(8305));
        assert_eq!(b.grand_total, MonetaryAmount::new(58_305));
    }

    #[test]
    fn test_single_consumption_rate() {
        let mut params = split_params();
        params.consumption_tax = ConsumptionTaxRates::Single { rate: dec!(0.1) };
        let b = TaxCalculator::calculate(&input(20, dec!(1.0), 50_000), &params).unwrap();

        assert_eq!(
            b.consumption_tax,
            ConsumptionTaxAmount::Single {
                amount: MonetaryAmount::new(3480)
            }
        );
        assert_eq!(b.consumption_tax.total(), Some(MonetaryAmount::new(3480)));
    }

    #[test]
    fn test_split_portions_rounded_independently() {
        // base 30001 + 4800 = 34801 -> 2714.478 and 765.622
        let b = TaxCalculator::calculate(&input(1, dec!(1.0), 50_002), &split_params()).unwrap();
        assert_eq!(b.assessed_value, MonetaryAmount::new(30_001));
        assert_eq!(b.duty, MonetaryAmount::new(4800));
        assert_eq!(
            b.consumption_tax,
            ConsumptionTaxAmount::Split {
                national: MonetaryAmount::new(2714),
                local: MonetaryAmount::new(766)
            }
        );
    }

    #[test]
    fn test_shipping_counts_toward_assessed_value() {
        let mut i = input(20, dec!(1.0), 10_000);
        i.shipping = MonetaryAmount::new(8000);
        let b = TaxCalculator::calculate(&i, &split_params()).unwrap();

        assert_eq!(b.purchase_total, MonetaryAmount::new(18_000));
        assert_eq!(b.assessed_value, MonetaryAmount::new(10_800));
        assert!(!b.duty_and_consumption_tax_exempt);
    }

    #[rstest]
    #[case::at_threshold(16_667, 10_000, true)]
    #[case::one_above(16_668, 10_001, false)]
    fn test_exemption_gate(
        #[case] price: u64,
        #[case] assessed: u64,
        #[case] exempt: bool,
    ) {
        let b = TaxCalculator::calculate(&input(20, dec!(1.0), price), &split_params()).unwrap();
        assert_eq!(b.assessed_value, MonetaryAmount::new(assessed));
        assert_eq!(b.duty_and_consumption_tax_exempt, exempt);
        assert_eq!(b.excise_tax, MonetaryAmount::new(305));
        if exempt {
            assert_eq!(b.duty, MonetaryAmount::ZERO);
            assert_eq!(b.consumption_tax.total(), Some(MonetaryAmount::ZERO));
        } else {
            assert_eq!(b.duty, MonetaryAmount::new(1600));
        }
    }

    #[rstest]
    #[case::full_gram(dec!(1.0), dec!(20.0), 305)]
    #[case::light_sticks(dec!(0.5), dec!(20), 305)]
    #[case::heavy_sticks(dec!(1.5), dec!(30.0), 457)]
    fn test_cigarette_equivalence(
        #[case] weight: Decimal,
        #[case] equivalents: Decimal,
        #[case] excise: u64,
    ) {
        let mut params = split_params();
        params.excise = ExcisePolicy::CigaretteEquivalence {
            rate_per_thousand: dec!(15244),
        };
        let b = TaxCalculator::calculate(&input(20, weight, 1000), &params).unwrap();

        assert_eq!(b.cigarette_equivalents, Some(equivalents));
        assert_eq!(b.excise_tax, MonetaryAmount::new(excise));
        assert_eq!(b.total_weight_grams, Decimal::from(20) * weight);
    }

    #[test]
    fn test_per_kilogram_ignores_equivalence_floor() {
        // 20 x 0.5 g = 10 g -> 0.01 kg * 15244 = 152.44
        let b = TaxCalculator::calculate(&input(20, dec!(0.5), 1000), &split_params()).unwrap();
        assert_eq!(b.excise_tax, MonetaryAmount::new(152));
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn test_invalid_quantity(#[case] sticks: i64) {
        let result = TaxCalculator::calculate(&input(sticks, dec!(1.0), 1000), &split_params());
        assert_eq!(result, Err(TaxError::InvalidQuantity(sticks)));
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-0.8))]
    fn test_invalid_weight(#[case] weight: Decimal) {
        let result = TaxCalculator::calculate(&input(20, weight, 1000), &split_params());
        assert_eq!(result, Err(TaxError::InvalidWeight(weight)));
    }

    #[test]
    fn test_invalid_rate_parameter() {
        let mut params = split_params();
        params.assessed_ratio = dec!(1.5);
        let result = TaxCalculator::calculate(&input(20, dec!(1.0), 1000), &params);
        assert_eq!(
            result,
            Err(TaxError::InvalidRateParameter {
                name: "assessed_ratio",
                value: dec!(1.5)
            })
        );
    }

    #[test]
    fn test_overflowing_purchase_total() {
        let mut i = input(1, dec!(1.0), u64::MAX);
        i.shipping = MonetaryAmount::new(1);
        let result = TaxCalculator::calculate(&i, &split_params());
        assert_eq!(result, Err(TaxError::AmountOutOfRange("purchase_total")));
    }

    #[test]
    fn test_overflowing_split_consumption_tax() {
        let params = RateParameters {
            duty_rate: Decimal::ZERO,
            consumption_tax: ConsumptionTaxRates::Split {
                national_rate: Decimal::ONE,
                local_rate: Decimal::ONE,
            },
            consumption_tax_base: ConsumptionTaxBase::AssessedValue,
            assessed_ratio: Decimal::ONE,
            exemption_threshold: MonetaryAmount::ZERO,
            ..split_params()
        };
        let i = input(1, dec!(1.0), 10_000_000_000_000_000_000);

        let result = TaxCalculator::calculate(&i, &params);
        assert_eq!(result, Err(TaxError::AmountOutOfRange("consumption_tax")));
    }

    #[test]
    fn test_zero_price_still_pays_excise_and_fee() {
        let b = TaxCalculator::calculate(&input(10, dec!(2.0), 0), &split_params()).unwrap();
        assert!(b.duty_and_consumption_tax_exempt);
        // 20 g -> 0.02 kg * 15244 = 304.88
        assert_eq!(b.excise_tax, MonetaryAmount::new(305));
        assert_eq!(b.grand_total, MonetaryAmount::new(505));
        assert_eq!(b.per_unit, MonetaryAmount::new(51));
    }
}
