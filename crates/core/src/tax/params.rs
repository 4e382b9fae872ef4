//! Jurisdiction rate parameters and the rate file schema they are built from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smokeduty_shared::MonetaryAmount;

use super::error::TaxError;

/// How the weight-based excise ("tobacco") tax is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ExcisePolicy {
    /// Straight rate per kilogram of total stick weight.
    PerKilogram {
        /// Currency units per kilogram.
        rate_per_kg: Decimal,
    },
    /// Each stick counts as its weight in grams of cigarette equivalents,
    /// never less than one; the rate applies per 1000 equivalents.
    CigaretteEquivalence {
        /// Currency units per 1000 cigarette equivalents.
        rate_per_thousand: Decimal,
    },
}

/// What the consumption tax is levied on when the shipment is not exempt.
///
/// The excise tax is never part of the base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionTaxBase {
    /// Assessed value only.
    AssessedValue,
    /// Assessed value plus the duty already computed.
    #[default]
    AssessedValuePlusDuty,
}

/// Consumption tax rate(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsumptionTaxRates {
    /// One rate over the whole base.
    Single {
        /// Fraction of the base.
        rate: Decimal,
    },
    /// National and local portions, each applied to the same base.
    Split {
        /// National portion.
        national_rate: Decimal,
        /// Local portion.
        local_rate: Decimal,
    },
}

/// Validated inputs to a single calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateParameters {
    /// Duty rate as a fraction of the assessed value.
    pub duty_rate: Decimal,
    /// Consumption tax rate(s).
    pub consumption_tax: ConsumptionTaxRates,
    /// Consumption tax base variant.
    pub consumption_tax_base: ConsumptionTaxBase,
    /// Excise computation variant.
    pub excise: ExcisePolicy,
    /// Fraction of the purchase total used as the dutiable basis.
    pub assessed_ratio: Decimal,
    /// Assessed values at or below this are exempt from duty and consumption tax.
    pub exemption_threshold: MonetaryAmount,
    /// Fixed customs handling fee, charged on every shipment.
    pub fixed_fee: MonetaryAmount,
}

fn check_fraction(name: &'static str, value: Decimal) -> Result<(), TaxError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(TaxError::InvalidRateParameter { name, value });
    }
    Ok(())
}

fn check_non_negative(name: &'static str, value: Decimal) -> Result<(), TaxError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(TaxError::InvalidRateParameter { name, value });
    }
    Ok(())
}

impl RateParameters {
    /// Checks that fractional rates lie in [0, 1] and currency rates are non-negative.
    pub fn validate(&self) -> Result<(), TaxError> {
        check_fraction("duty_rate", self.duty_rate)?;
        check_fraction("assessed_ratio", self.assessed_ratio)?;

        match self.consumption_tax {
            ConsumptionTaxRates::Single { rate } => check_fraction("consumption_rate", rate)?,
            ConsumptionTaxRates::Split {
                national_rate,
                local_rate,
            } => {
                check_fraction("consumption_national_rate", national_rate)?;
                check_fraction("consumption_local_rate", local_rate)?;
            }
        }

        match self.excise {
            ExcisePolicy::PerKilogram { rate_per_kg } => {
                check_non_negative("excise_rate_per_kg", rate_per_kg)
            }
            ExcisePolicy::CigaretteEquivalence { rate_per_thousand } => {
                check_non_negative("excise_rate_per_thousand", rate_per_thousand)
            }
        }
    }
}

/// Schema of the on-disk rate file.
///
/// Every field has a default so a missing or partial file still yields a
/// usable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// Duty rate used when the request does not override it.
    pub default_duty_rate: Decimal,
    /// Consumption tax rate(s).
    pub consumption_tax: ConsumptionTaxRates,
    /// Consumption tax base variant.
    pub consumption_tax_base: ConsumptionTaxBase,
    /// Excise computation variant.
    pub excise: ExcisePolicy,
    /// Fraction of the purchase total used as the dutiable basis.
    pub assessed_ratio: Decimal,
    /// Exemption threshold in local currency.
    pub exemption_threshold: MonetaryAmount,
    /// Customs handling fee in local currency.
    pub customs_fee: MonetaryAmount,
    /// Free-form marker of when the rates were last revised.
    pub updated_at: String,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            default_duty_rate: Decimal::new(16, 2),
            consumption_tax: ConsumptionTaxRates::Split {
                national_rate: Decimal::new(78, 3),
                local_rate: Decimal::new(22, 3),
            },
            consumption_tax_base: ConsumptionTaxBase::AssessedValuePlusDuty,
            excise: ExcisePolicy::PerKilogram {
                rate_per_kg: Decimal::from(15_244),
            },
            assessed_ratio: Decimal::new(6, 1),
            exemption_threshold: MonetaryAmount::new(10_000),
            customs_fee: MonetaryAmount::new(200),
            updated_at: "N/A".to_string(),
        }
    }
}

impl RateConfig {
    /// Builds the parameters for one calculation, applying a duty-rate override.
    ///
    /// Ranges are checked by the calculator, not here.
    #[must_use]
    pub fn parameters(&self, duty_rate_override: Option<Decimal>) -> RateParameters {
        RateParameters {
            duty_rate: duty_rate_override.unwrap_or(self.default_duty_rate),
            consumption_tax: self.consumption_tax,
            consumption_tax_base: self.consumption_tax_base,
            excise: self.excise,
            assessed_ratio: self.assessed_ratio,
            exemption_threshold: self.exemption_threshold,
            fixed_fee: self.customs_fee,
        }
    }
}
