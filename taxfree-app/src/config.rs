//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use exchange_rates::DEFAULT_API_URL;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://taxfree.db?mode=rwc";

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub rates_api_url: String,
    pub rates_timeout: Duration,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("PORT is not a valid port: {}", e))?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let rates_api_url = lookup("RATES_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs: u64 = lookup("RATES_TIMEOUT_SECS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("RATES_TIMEOUT_SECS is not a number: {}", e))?;

        let json_logs = lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json"));

        Ok(Self {
            port,
            database_url,
            rates_api_url,
            rates_timeout: Duration::from_secs(timeout_secs),
            json_logs,
        })
    }
}
