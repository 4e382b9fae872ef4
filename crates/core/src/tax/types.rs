//! Calculation input and breakdown types.

use rust_decimal::Decimal;
use serde::Serialize;
use smokeduty_shared::MonetaryAmount;

use super::params::{ConsumptionTaxBase, ExcisePolicy};

/// Normalized inputs for one calculation, amounts already in local currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationInput {
    /// Number of sticks.
    pub sticks: i64,
    /// Weight of a single stick in grams.
    pub weight_per_stick_grams: Decimal,
    /// Item price in local currency.
    pub item_price: MonetaryAmount,
    /// Shipping cost in local currency.
    pub shipping: MonetaryAmount,
}

/// Consumption tax, shaped after the configured rate variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsumptionTaxAmount {
    /// A single consumption tax.
    Single {
        /// Amount.
        amount: MonetaryAmount,
    },
    /// National and local portions, rounded independently.
    Split {
        /// National portion.
        national: MonetaryAmount,
        /// Local portion.
        local: MonetaryAmount,
    },
}

impl ConsumptionTaxAmount {
    /// Sum of all portions, or `None` if it does not fit in a `MonetaryAmount`.
    #[must_use]
    pub const fn total(&self) -> Option<MonetaryAmount> {
        match *self {
            Self::Single { amount } => Some(amount),
            Self::Split { national, local } => national.checked_add(local),
        }
    }
}

/// Itemized result of one calculation. All money fields are whole local units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    /// Item price.
    pub item_price: MonetaryAmount,
    /// Shipping.
    pub shipping: MonetaryAmount,
    /// Item price plus shipping.
    pub purchase_total: MonetaryAmount,

    /// Dutiable basis.
    pub assessed_value: MonetaryAmount,
    /// True when duty and consumption tax are waived.
    pub duty_and_consumption_tax_exempt: bool,

    /// Customs duty.
    pub duty: MonetaryAmount,
    /// Weight-based excise ("tobacco") tax.
    pub excise_tax: MonetaryAmount,
    /// Consumption tax.
    pub consumption_tax: ConsumptionTaxAmount,
    /// Customs handling fee.
    pub customs_fee: MonetaryAmount,

    /// Total stick weight in grams.
    pub total_weight_grams: Decimal,
    /// Cigarette equivalents, only for the equivalence excise variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cigarette_equivalents: Option<Decimal>,
    /// Excise variant used.
    pub excise_policy: ExcisePolicy,
    /// Consumption tax base variant used.
    pub consumption_tax_base: ConsumptionTaxBase,

    /// Duty + excise + consumption tax + fee.
    pub taxes_and_fees_total: MonetaryAmount,
    /// Purchase total + taxes and fees.
    pub grand_total: MonetaryAmount,
    /// Grand total divided by the stick count, rounded.
    pub per_unit: MonetaryAmount,
}
