//! Builder for configuring client instances

use std::time::Duration;

use super::{ChanClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::{ExplorerError, Result};
use crate::api::TtlPolicy;
use crate::cache::{CacheConfig, TtlCache};
use crate::limiter::{DEFAULT_INTERVAL, RateLimiter};

/// Builder for [`ChanClient`].
///
/// ```rust
/// # use imgboard_explorer::ChanClient;
/// # use std::time::Duration;
/// let client = ChanClient::builder()
///     .base_url("https://a.4cdn.org")
///     .timeout(Duration::from_secs(5))
///     .max_entries(250)
///     .rate_limit(Duration::from_millis(1500))
///     .build()
///     .unwrap();
/// assert!(!client.is_started());
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    timeout: Duration,
    cache: CacheConfig,
    interval: Duration,
    ttl: TtlPolicy,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cache: CacheConfig::default(),
            interval: DEFAULT_INTERVAL,
            ttl: TtlPolicy::default(),
        }
    }

    /// Upstream API root (default: `https://a.4cdn.org`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Per-request timeout (default: 10s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Maximum number of cached documents (default: 100).
    pub fn max_entries(mut self, n: usize) -> Self {
        self.cache = self.cache.max_entries(n);
        self
    }

    /// Replace the whole cache configuration.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Minimum spacing between two upstream requests (default: 1s).
    pub fn rate_limit(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Freshness windows used by the typed accessors.
    pub fn ttl_policy(mut self, ttl: TtlPolicy) -> Self {
        self.ttl = ttl;
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// No connection is opened yet; see [`ChanClient::start`].
    pub fn build(self) -> Result<ChanClient> {
        if self.timeout.is_zero() {
            return Err(ExplorerError::Configuration(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        let cache = TtlCache::from_config(&self.cache)?;
        Ok(ChanClient::from_parts(
            self.base_url,
            self.timeout,
            cache,
            RateLimiter::new(self.interval),
            self.ttl,
        ))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
