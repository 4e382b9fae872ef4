//! File-backed persistence for Smokeduty.
//!
//! This crate provides:
//! - The tax rate file repository (re-read on every calculation)
//! - The daily exchange rate cache repository

pub mod error;
pub mod repositories;

pub use error::StoreError;
pub use repositories::{FxCacheRepository, RateConfigRepository};
