//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use anyhow::Context;

use crate::fetch::DEFAULT_MEASURE_URL;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults,
/// except the API token, which has none.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL in seconds applied to every cached measurement
    pub cache_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Bearer token for the measurement API
    pub api_token: Option<String>,
    /// Measurement API endpoint
    pub api_url: String,
    /// Timeout in seconds for one measurement API call
    pub fetch_timeout: u64,
    /// Deployment environment, `production` quietens logging
    pub environment: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1073741824)
    /// - `CACHE_TTL` - Entry TTL in seconds (default: 86400)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `SCOPE3_API_TOKEN` - Measurement API token (no default)
    /// - `SCOPE3_API_URL` - Measurement API endpoint
    /// - `FETCH_TIMEOUT` - Measurement call timeout in seconds (default: 10)
    /// - `ENV` - Deployment environment (default: development)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            api_token: env::var("SCOPE3_API_TOKEN").ok().filter(|v| !v.is_empty()),
            api_url: env::var("SCOPE3_API_URL").unwrap_or(defaults.api_url),
            fetch_timeout: parse_var("FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
            environment: env::var("ENV").unwrap_or(defaults.environment),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Tracing filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_production() {
            "warn"
        } else {
            "emissions_cache=info,tower_http=info"
        }
    }

    /// Returns the API token, failing start-up when it is missing.
    pub fn require_api_token(&self) -> anyhow::Result<String> {
        self.api_token
            .clone()
            .context("SCOPE3_API_TOKEN is not set in the environment variables")
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1 << 30,
            cache_ttl: 24 * 60 * 60,
            server_port: 8080,
            api_token: None,
            api_url: DEFAULT_MEASURE_URL.to_string(),
            fetch_timeout: 10,
            environment: "development".to_string(),
        }
    }
}
