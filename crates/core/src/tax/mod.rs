//! Import duty, excise and consumption tax for personal tobacco shipments.

pub mod calculator;
pub mod error;
pub mod params;
pub mod types;


pub use calculator::TaxCalculator;
pub use error::TaxError;
pub use params::{
    ConsumptionTaxBase, ConsumptionTaxRates, ExcisePolicy, RateConfig, RateParameters,
};
pub use types::{CalculationInput, ConsumptionTaxAmount, TaxBreakdown};
