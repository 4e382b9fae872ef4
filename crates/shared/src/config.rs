//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::CurrencyCode;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Exchange rate lookup configuration.
    #[serde(default)]
    pub fx: FxConfig,
    /// Tax rate file configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Exchange rate provider and cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FxConfig {
    /// Base URL of the Frankfurter-compatible rate provider.
    #[serde(default = "default_provider_url")]
    pub provider_url: String,
    /// Request timeout for the provider, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Path of the daily rate cache file.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    /// Currency that all amounts are converted into.
    #[serde(default = "default_local_currency")]
    pub local_currency: CurrencyCode,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            provider_url: default_provider_url(),
            timeout_secs: default_timeout_secs(),
            cache_path: default_cache_path(),
            local_currency: default_local_currency(),
        }
    }
}

fn default_provider_url() -> String {
    "https://api.frankfurter.app".to_string()
}

fn default_timeout_secs() -> u64 {
    6
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("fx_cache.json")
}

fn default_local_currency() -> CurrencyCode {
    CurrencyCode::from_static("JPY")
}

/// Tax rate file configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Path of the JSON rate file, re-read on every calculation.
    #[serde(default = "default_rates_path")]
    pub path: PathBuf,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            path: default_rates_path(),
        }
    }
}

fn default_rates_path() -> PathBuf {
    PathBuf::from("rates.json")
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("SMOKEDUTY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
