//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL; `None` selects the in-process store
    pub redis_url: Option<String>,
    /// HTTP server port
    pub server_port: u16,
    /// Expiry sweep interval in seconds (in-process store only)
    pub cleanup_interval: u64,
    /// Upstream fetch timeout in seconds
    pub request_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Redis URL, e.g. `redis://127.0.0.1/` (default: unset, in-process store)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    /// - `REQUEST_TIMEOUT` - Upstream fetch timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            server_port: parse_var("SERVER_PORT").unwrap_or(3000),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(1),
            request_timeout: parse_var("REQUEST_TIMEOUT").unwrap_or(30),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: None,
            server_port: 3000,
            cleanup_interval: 1,
            request_timeout: 30,
        }
    }
}
