//! Configuration Module
//!
//! Loads engine configuration from `CLOUDSCOPE_*` environment variables once
//! at startup into an immutable value.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::cache::DEFAULT_MAX_SIZE_BYTES;
use crate::error::ConfigError;

/// Engine configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Per-attempt timeout for remote calls
    pub api_timeout: Duration,
    /// Retries after the first attempt
    pub api_max_retries: u32,
    /// Sleep before the first retry
    pub api_retry_delay: Duration,
    /// Exponential backoff multiplier
    pub api_retry_backoff: f64,
    /// Wait hint reported on quota failures
    pub quota_wait: Duration,
    /// Whether fetchers consult the cache at all
    pub cache_enabled: bool,
    /// TTL for cached project listings
    pub cache_ttl_projects: Duration,
    /// TTL for every other cached listing
    pub cache_ttl_resources: Duration,
    /// Total size budget of the cache
    pub cache_max_bytes: usize,
    /// Interval between background expiry sweeps
    pub cache_cleanup_interval: Duration,
    /// HTTP server port
    pub server_port: u16,
    /// Inventory snapshot served by the offline fetcher
    pub inventory_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CLOUDSCOPE_API_TIMEOUT` - Per-attempt timeout in seconds (default: 30)
    /// - `CLOUDSCOPE_API_MAX_RETRIES` - Retry attempts (default: 3)
    /// - `CLOUDSCOPE_API_RETRY_DELAY` - Initial retry delay in seconds, fractional allowed (default: 1.0)
    /// - `CLOUDSCOPE_API_RETRY_BACKOFF` - Backoff multiplier (default: 2.0)
    /// - `CLOUDSCOPE_QUOTA_WAIT_TIME` - Quota wait hint in seconds (default: 60)
    /// - `CLOUDSCOPE_CACHE_ENABLED` - `true`/`false` (default: true)
    /// - `CLOUDSCOPE_CACHE_TTL_PROJECTS` - Project TTL in seconds (default: 600)
    /// - `CLOUDSCOPE_CACHE_TTL_RESOURCES` - Resource TTL in seconds (default: 300)
    /// - `CLOUDSCOPE_CACHE_MAX_BYTES` - Cache size budget (default: 100 MB)
    /// - `CLOUDSCOPE_CACHE_CLEANUP_INTERVAL` - Sweep interval in seconds (default: 60)
    /// - `CLOUDSCOPE_SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLOUDSCOPE_INVENTORY` - Path to an inventory JSON snapshot (default: unset)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let secs = |name: &str, default: Duration| {
            let raw: f64 = parse_or(&lookup, name, default.as_secs_f64());
            Duration::try_from_secs_f64(raw.max(0.0)).unwrap_or(default)
        };

        Self {
            api_timeout: secs("CLOUDSCOPE_API_TIMEOUT", defaults.api_timeout),
            api_max_retries: parse_or(&lookup, "CLOUDSCOPE_API_MAX_RETRIES", defaults.api_max_retries),
            api_retry_delay: secs("CLOUDSCOPE_API_RETRY_DELAY", defaults.api_retry_delay),
            api_retry_backoff: parse_or(
                &lookup,
                "CLOUDSCOPE_API_RETRY_BACKOFF",
                defaults.api_retry_backoff,
            ),
            quota_wait: secs("CLOUDSCOPE_QUOTA_WAIT_TIME", defaults.quota_wait),
            cache_enabled: parse_or(&lookup, "CLOUDSCOPE_CACHE_ENABLED", defaults.cache_enabled),
            cache_ttl_projects: secs("CLOUDSCOPE_CACHE_TTL_PROJECTS", defaults.cache_ttl_projects),
            cache_ttl_resources: secs("CLOUDSCOPE_CACHE_TTL_RESOURCES", defaults.cache_ttl_resources),
            cache_max_bytes: parse_or(&lookup, "CLOUDSCOPE_CACHE_MAX_BYTES", defaults.cache_max_bytes),
            cache_cleanup_interval: secs("CLOUDSCOPE_CACHE_CLEANUP_INTERVAL", defaults.cache_cleanup_interval),
            server_port: parse_or(&lookup, "CLOUDSCOPE_SERVER_PORT", defaults.server_port),
            inventory_path: lookup("CLOUDSCOPE_INVENTORY")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Rejects combinations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_timeout.is_zero() {
            return Err(ConfigError::Invalid("api timeout must be positive".into()));
        }
        if !self.api_retry_backoff.is_finite() || self.api_retry_backoff < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "retry backoff must be >= 1.0, got {}",
                self.api_retry_backoff
            )));
        }
        if self.cache_max_bytes == 0 {
            return Err(ConfigError::Invalid("cache size must be positive".into()));
        }
        if self.cache_cleanup_interval.is_zero() {
            return Err(ConfigError::Invalid("cleanup interval must be positive".into()));
        }
        Ok(())
    }
}

/// Parses a variable, falling back to `default` when unset or malformed.
fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => default,
        Some(raw) => match raw.trim().to_ascii_lowercase().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring unparsable {}={:?}, using default", name, raw);
                default
            }
        },
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_timeout: Duration::from_secs(30),
            api_max_retries: 3,
            api_retry_delay: Duration::from_secs(1),
            api_retry_backoff: 2.0,
            quota_wait: Duration::from_secs(60),
            cache_enabled: true,
            cache_ttl_projects: Duration::from_secs(600),
            cache_ttl_resources: Duration::from_secs(300),
            cache_max_bytes: DEFAULT_MAX_SIZE_BYTES,
            cache_cleanup_interval: Duration::from_secs(60),
            server_port: 3000,
            inventory_path: None,
        }
    }
}
