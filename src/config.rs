//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::cache::CachePolicy;
use crate::error::Result;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries per namespace, None = unbounded
    pub max_entries: Option<usize>,
    /// Maximum bytes per namespace, None = unbounded
    pub max_size: Option<u64>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum entries per namespace (default: unbounded, 0 = unbounded)
    /// - `MAX_SIZE` - Maximum bytes per namespace (default: unbounded, 0 = unbounded)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            max_entries: env_limit("MAX_ENTRIES"),
            max_size: env_limit("MAX_SIZE"),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }

    /// Builds the eviction policy applied to every namespace.
    pub fn policy(&self) -> Result<CachePolicy> {
        CachePolicy::new(self.max_entries, self.max_size)
    }
}

/// Reads a positive limit; unset, unparsable or zero means no limit.
fn env_limit<T>(name: &str) -> Option<T>
where
    T: std::str::FromStr + PartialEq + Default,
{
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .filter(|v| *v != T::default())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: None,
            max_size: None,
            server_port: 3000,
        }
    }
}
