//! Repository abstractions for local files.
//!
//! Repositories hide the on-disk JSON layout from the rest of the application.

pub mod fx_cache;
pub mod rate_config;

pub use fx_cache::FxCacheRepository;
pub use rate_config::RateConfigRepository;
