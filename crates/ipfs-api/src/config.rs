//! Client configuration.

use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable overriding [`ApiConfig::default_ping_count`].
pub const ENV_PING_COUNT: &str = "IPFS_PING_COUNT";

/// Environment variable overriding [`ApiConfig::default_recursive`].
pub const ENV_RESOLVE_RECURSIVE: &str = "IPFS_RESOLVE_RECURSIVE";

/// Environment variable overriding [`ApiConfig::max_line_length`].
pub const ENV_MAX_LINE_LENGTH: &str = "IPFS_MAX_LINE_LENGTH";

/// Default number of ping probes.
pub const DEFAULT_PING_COUNT: u32 = 10;

/// Default upper bound on one line of a streamed response (1 MiB).
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Defaults applied by [`GenericApi`](crate::GenericApi) operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Probes sent by `ping` when the caller gives no count.
    #[serde(default = "default_ping_count")]
    pub default_ping_count: u32,

    /// Whether `resolve` follows names recursively when the caller does not say.
    #[serde(default = "default_true")]
    pub default_recursive: bool,

    /// Longest line accepted from a streamed response.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
}

fn default_ping_count() -> u32 {
    DEFAULT_PING_COUNT
}

fn default_true() -> bool {
    true
}

fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE_LENGTH
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_ping_count: DEFAULT_PING_COUNT,
            default_recursive: true,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl ApiConfig {
    /// Sets the default ping count.
    #[must_use]
    pub fn with_ping_count(mut self, count: u32) -> Self {
        self.default_ping_count = count;
        self
    }

    /// Sets the default resolve recursion flag.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.default_recursive = recursive;
        self
    }

    /// Sets the maximum streamed line length.
    #[must_use]
    pub fn with_max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.default_ping_count == 0 {
            return Err(ApiError::config("ping count must be at least 1"));
        }
        if self.max_line_length == 0 {
            return Err(ApiError::config("max line length must be at least 1"));
        }
        Ok(())
    }

    /// Builds a configuration from defaults overridden by the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from defaults overridden by `lookup`.
    ///
    /// Unset keys keep their defaults; set keys must parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_PING_COUNT) {
            config.default_ping_count = parse_var(ENV_PING_COUNT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_RESOLVE_RECURSIVE) {
            config.default_recursive = parse_var(ENV_RESOLVE_RECURSIVE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_LINE_LENGTH) {
            config.max_line_length = parse_var(ENV_MAX_LINE_LENGTH, &raw)?;
        }

        config.validate()?;
        debug!(
            ping_count = config.default_ping_count,
            recursive = config.default_recursive,
            max_line_length = config.max_line_length,
            "loaded api config"
        );
        Ok(config)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ApiError::config(format!("{key}={raw}: {e}")))
}
