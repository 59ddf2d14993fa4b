//! Rate-limited, revalidating fetch client for the upstream JSON API.
//!
//! [`ChanClient`] is the only component that talks to the upstream. Each
//! [`fetch_json`](ChanClient::fetch_json) call:
//!
//! 1. canonicalises the request path into the cache key (see [`canonical_url`]),
//! 2. returns a fresh cached document without any network traffic,
//! 3. otherwise waits for the [`RateLimiter`] and sends a GET, conditional on
//!    `If-Modified-Since` when the cache still knows a `Last-Modified` token,
//! 4. on `304 Not Modified` pushes the old entry's expiry forward and returns
//!    the very same `Arc`,
//! 5. on success parses the body and replaces the cache entry.
//!
//! Failures are never retried here. Transport problems, non-success statuses
//! and malformed bodies are distinct [`ExplorerError`] variants so callers
//! can tell an unreachable upstream from a broken one.
//!
//! # Lifecycle
//!
//! The HTTP connection pool is created lazily on first use or by
//! [`start`](ChanClient::start), and released by [`close`](ChanClient::close).
//! A fetch after `close` simply creates a new pool.

mod builder;

pub use builder::ClientBuilder;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use reqwest::StatusCode;
use reqwest::header::{IF_MODIFIED_SINCE, LAST_MODIFIED};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{ChanApi, TtlPolicy};
use crate::cache::{CacheEntry, CacheStats, TtlCache};
use crate::config::Config;
use crate::limiter::RateLimiter;
use crate::telemetry;
use crate::{ExplorerError, Result};

/// Default upstream API root.
pub const DEFAULT_BASE_URL: &str = "https://a.4cdn.org";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch client owning the cache, the rate limiter and the connection pool.
///
/// Construct one per process with [`ChanClient::builder`] or
/// [`ChanClient::from_config`] and share it through an `Arc`.
pub struct ChanClient {
    base_url: String,
    timeout: Duration,
    cache: Mutex<TtlCache>,
    limiter: RateLimiter,
    http: Mutex<Option<Client>>,
    ttl: TtlPolicy,
}

impl ChanClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Build a client from a loaded configuration file.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::builder()
            .base_url(&config.upstream.base_url)
            .timeout(Duration::from_secs(config.upstream.timeout_secs))
            .max_entries(config.cache.max_entries)
            .rate_limit(Duration::from_millis(config.rate_limit.interval_ms))
            .ttl_policy(config.ttl.policy())
            .build()
    }

    pub(crate) fn from_parts(
        base_url: String,
        timeout: Duration,
        cache: TtlCache,
        limiter: RateLimiter,
        ttl: TtlPolicy,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            cache: Mutex::new(cache),
            limiter,
            http: Mutex::new(None),
            ttl,
        }
    }

    /// Upstream API root, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Establish the connection pool. Calling it again is a no-op.
    pub fn start(&self) -> Result<()> {
        self.connection().map(|_| ())
    }

    /// Release the connection pool. Calling it again is a no-op.
    ///
    /// Requests already in flight keep their own handle and finish normally.
    pub fn close(&self) {
        if self.http.lock().take().is_some() {
            info!(base_url = %self.base_url, "upstream connection closed");
        }
    }

    /// Whether a connection pool currently exists.
    pub fn is_started(&self) -> bool {
        self.http.lock().is_some()
    }

    /// Fetch a JSON document, served from cache while it is fresh.
    ///
    /// `ttl` is the freshness window applied when the document is stored or
    /// revalidated by this call.
    pub async fn fetch_json(&self, path: &str, ttl: Duration) -> Result<Arc<Value>> {
        let url = canonical_url(&self.base_url, path);

        let cached = self.cache.lock().get(&url);
        if let Some(payload) = cached {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            debug!(url = %url, "cache hit");
            return Ok(payload);
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);

        let prior = self.cache.lock().get_entry(&url);
        let http = self.connection()?;

        self.limiter.admit().await;

        let mut request = http.get(&url);
        let token = prior
            .as_ref()
            .and_then(|entry| entry.revalidation_token.as_deref());
        if let Some(token) = token {
            request = request.header(IF_MODIFIED_SINCE, token);
        }
        debug!(url = %url, conditional = token.is_some(), "fetching from upstream");

        let response = request.send().await.map_err(|e| {
            metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL, "status" => "error")
                .increment(1);
            warn!(url = %url, error = %e, "upstream request failed");
            ExplorerError::from(e)
        })?;

        let status = response.status();
        metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL,
            "status" => status.as_u16().to_string(),
        )
        .increment(1);

        if status == StatusCode::NOT_MODIFIED {
            if let Some(entry) = prior {
                return Ok(self.revalidated(&url, entry, ttl));
            }
        }

        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "upstream returned error status");
            return Err(ExplorerError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&body).map_err(|source| {
            warn!(url = %url, error = %source, "upstream returned malformed JSON");
            ExplorerError::Decode {
                url: url.clone(),
                source,
            }
        })?;
        let payload = Arc::new(payload);

        debug!(url = %url, last_modified = ?last_modified, "caching upstream document");
        self.cache
            .lock()
            .set(url, Arc::clone(&payload), ttl, last_modified);
        Ok(payload)
    }

    /// Peek at the cache entry for `path`, stale or not.
    pub fn cache_entry(&self, path: &str) -> Option<CacheEntry> {
        self.cache
            .lock()
            .get_entry(&canonical_url(&self.base_url, path))
    }

    /// Current cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    /// Drop every cached document.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    /// Record a successful `304 Not Modified` and pick the payload to return.
    ///
    /// While the request was in flight the entry may have been evicted, in
    /// which case it is put back, or replaced with newer content by a
    /// concurrent fetch, in which case the newer content wins and keeps its
    /// own expiry.
    fn revalidated(&self, url: &str, prior: CacheEntry, ttl: Duration) -> Arc<Value> {
        metrics::counter!(telemetry::REVALIDATIONS_TOTAL).increment(1);

        let mut cache = self.cache.lock();
        match cache.get_entry(url) {
            Some(current) if Arc::ptr_eq(&current.payload, &prior.payload) => {
                debug!(url = %url, "upstream document not modified");
                cache.refresh(url, ttl);
                prior.payload
            }
            Some(current) => {
                debug!(url = %url, "entry replaced during revalidation, keeping newer document");
                current.payload
            }
            None => {
                debug!(url = %url, "re-caching document evicted during revalidation");
                cache.set(
                    url,
                    Arc::clone(&prior.payload),
                    ttl,
                    prior.revalidation_token,
                );
                prior.payload
            }
        }
    }

    /// Return the shared connection pool, creating it if needed.
    fn connection(&self) -> Result<Client> {
        let mut http = self.http.lock();
        if let Some(client) = http.as_ref() {
            return Ok(client.clone());
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("imgboard-explorer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ExplorerError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;
        info!(
            base_url = %self.base_url,
            timeout_ms = self.timeout.as_millis() as u64,
            "upstream connection started"
        );
        *http = Some(client.clone());
        Ok(client)
    }
}

#[async_trait]
impl ChanApi for ChanClient {
    async fn fetch_json(&self, path: &str, ttl: Duration) -> Result<Arc<Value>> {
        ChanClient::fetch_json(self, path, ttl).await
    }

    fn ttl_policy(&self) -> TtlPolicy {
        self.ttl.clone()
    }
}

/// Join the API root and a request path into the canonical cache key.
///
/// Leading, trailing and repeated slashes in `path` are collapsed, so
/// `"/boards.json"`, `"boards.json"` and `"//boards.json/"` all map to the
/// same URL.
pub fn canonical_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        format!("{base}/")
    } else {
        format!("{base}/{}", segments.join("/"))
    }
}
