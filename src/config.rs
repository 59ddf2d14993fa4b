//! Configuration loading.
//!
//! Configuration is read from a TOML file with the following resolution order:
//! 1. `--config <path>` (explicit, must exist)
//! 2. `~/.imgboard-explorer/config.toml` (user)
//! 3. built-in defaults
//!
//! Every key is optional; a missing section falls back to its defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::TtlPolicy;
use crate::{ExplorerError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub ttl: TtlConfig,
}

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// API root (default: https://a.4cdn.org).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    crate::client::DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

/// Response cache limits.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Maximum cached documents (default: 100).
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

fn default_max_entries() -> usize {
    crate::cache::DEFAULT_MAX_ENTRIES
}

/// Upstream request spacing.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Minimum milliseconds between two upstream requests (default: 1000).
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    1000
}

/// Freshness windows in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct TtlConfig {
    #[serde(default = "default_boards_ttl")]
    pub boards_secs: u64,
    #[serde(default = "default_catalog_ttl")]
    pub catalog_secs: u64,
    #[serde(default = "default_thread_ttl")]
    pub thread_secs: u64,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            boards_secs: default_boards_ttl(),
            catalog_secs: default_catalog_ttl(),
            thread_secs: default_thread_ttl(),
        }
    }
}

fn default_boards_ttl() -> u64 {
    3600
}

fn default_catalog_ttl() -> u64 {
    30
}

fn default_thread_ttl() -> u64 {
    10
}

impl TtlConfig {
    pub fn policy(&self) -> TtlPolicy {
        TtlPolicy {
            boards: Duration::from_secs(self.boards_secs),
            catalog: Duration::from_secs(self.catalog_secs),
            thread: Duration::from_secs(self.thread_secs),
        }
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; an error if it does not exist)
    /// 2. `~/.imgboard-explorer/config.toml`
    /// 3. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ExplorerError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::parse(&content).map_err(|e| match e {
            ExplorerError::Configuration(msg) => {
                ExplorerError::Configuration(format!("{msg} (in {path:?})"))
            }
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| {
            ExplorerError::Configuration(format!("Failed to parse config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.cache.max_entries == 0 {
            return Err(ExplorerError::Configuration(
                "cache.max_entries must be at least 1".to_string(),
            ));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(ExplorerError::Configuration(
                "upstream.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.upstream.base_url.trim().is_empty() {
            return Err(ExplorerError::Configuration(
                "upstream.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(ExplorerError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".imgboard-explorer").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        Ok(None)
    }
}
