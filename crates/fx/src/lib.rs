//! Exchange rate lookup for Smokeduty.
//!
//! Rates come from, in order of preference:
//! 1. a rate entered by the user,
//! 2. today's entry in the local file cache,
//! 3. one live fetch from the provider per pair per day,
//! 4. a user-supplied fallback when the provider is unavailable.

pub mod error;
pub mod provider;
pub mod service;

pub use error::FxError;
pub use provider::{FrankfurterProvider, RateProvider};
pub use service::{RateLookup, RateLookupService};
