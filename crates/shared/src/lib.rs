//! Shared types, errors, and configuration for Smokeduty.
//!
//! This crate provides common types used across all other crates:
//! - Monetary amounts in whole local-currency units
//! - Validated ISO 4217 currency codes
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use types::{CurrencyCode, MonetaryAmount};
