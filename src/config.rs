//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::web::DEFAULT_PAGE_TTL;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for cached pages
    pub page_ttl: u64,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Timeout in seconds for outbound page fetches
    pub fetch_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PAGE_TTL` - Page cache TTL in seconds (default: 10, zero keeps the default)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1, zero keeps the default)
    /// - `FETCH_TIMEOUT` - Page fetch timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            page_ttl: positive_env_or("PAGE_TTL", defaults.page_ttl),
            cleanup_interval: positive_env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            fetch_timeout: env_or("FETCH_TIMEOUT", defaults.fetch_timeout),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            page_ttl: DEFAULT_PAGE_TTL,
            cleanup_interval: 1,
            fetch_timeout: 30,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Like [`env_or`], but zero also falls back to `default`.
fn positive_env_or(name: &str, default: u64) -> u64 {
    match env_or(name, default) {
        0 => default,
        value => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.page_ttl, 10);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.fetch_timeout, 30);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("PAGE_TTL");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("FETCH_TIMEOUT");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.page_ttl, 10);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.fetch_timeout, 30);
    }

    #[test]
    fn test_env_or_ignores_unparsable_values() {
        env::set_var("TRACKED_CACHE_TEST_PORT", "not-a-port");
        assert_eq!(env_or("TRACKED_CACHE_TEST_PORT", 8080u16), 8080);

        env::set_var("TRACKED_CACHE_TEST_PORT", "9090");
        assert_eq!(env_or("TRACKED_CACHE_TEST_PORT", 8080u16), 9090);
        env::remove_var("TRACKED_CACHE_TEST_PORT");
    }

    #[test]
    fn test_zero_durations_fall_back_to_defaults() {
        env::set_var("TRACKED_CACHE_TEST_TTL", "0");
        assert_eq!(positive_env_or("TRACKED_CACHE_TEST_TTL", 10), 10);

        env::set_var("TRACKED_CACHE_TEST_TTL", "5");
        assert_eq!(positive_env_or("TRACKED_CACHE_TEST_TTL", 10), 5);
        env::remove_var("TRACKED_CACHE_TEST_TTL");
    }
}
