//! Configuration Module
//!
//! Handles loading guard configuration from environment variables.

use std::env;

/// Guard configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Maximum number of entries the cache can hold
    pub cache_capacity: usize,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: u64,
    /// Background sweep task interval in seconds
    pub sweep_interval: u64,
    /// Total attempts the retry executor makes per call
    pub retry_max_attempts: u32,
    /// Delay in milliseconds before the first retry
    pub retry_base_delay_ms: u64,
    /// Upper bound in milliseconds on any single retry delay
    pub retry_max_delay_ms: u64,
    /// Requests granted per identity per rate window
    pub rate_quota: u32,
    /// Rate window length in seconds
    pub rate_window: u64,
}

impl GuardConfig {
    /// Creates a new GuardConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 200)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `RETRY_MAX_ATTEMPTS` - Attempts per guarded call (default: 3)
    /// - `RETRY_BASE_DELAY_MS` - First retry delay (default: 1000)
    /// - `RETRY_MAX_DELAY_MS` - Retry delay cap (default: 16000)
    /// - `RATE_QUOTA` - Requests per identity per window (default: 30)
    /// - `RATE_WINDOW` - Rate window in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            cache_capacity: env_parse("CACHE_CAPACITY", 200),
            default_ttl: env_parse("DEFAULT_TTL", 300),
            sweep_interval: env_parse("SWEEP_INTERVAL", 60),
            retry_max_attempts: env_parse("RETRY_MAX_ATTEMPTS", 3),
            retry_base_delay_ms: env_parse("RETRY_BASE_DELAY_MS", 1000),
            retry_max_delay_ms: env_parse("RETRY_MAX_DELAY_MS", 16000),
            rate_quota: env_parse("RATE_QUOTA", 30),
            rate_window: env_parse("RATE_WINDOW", 60),
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 200,
            default_ttl: 300,
            sweep_interval: 60,
            retry_max_attempts: 3,
            retry_base_delay_ms: 1000,
            retry_max_delay_ms: 16000,
            rate_quota: 30,
            rate_window: 60,
        }
    }
}

/// Reads an env var, falling back to the default when unset or unparsable.
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
