//! Core business logic for Smokeduty.
//!
//! This crate contains pure arithmetic with ZERO web, file or network
//! dependencies. Every function is deterministic and safe to call from many
//! request handlers at once.
//!
//! # Modules
//!
//! - `currency` - Foreign-to-local conversion and exchange rate types
//! - `tax` - Duty, excise and consumption tax calculation

pub mod currency;
pub mod tax;
