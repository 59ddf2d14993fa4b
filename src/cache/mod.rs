//! Caching subsystem.
//!
//! [`TtlCache`] holds parsed upstream documents keyed on canonical request
//! URL. It is bounded by entry count, evicts least recently used, and
//! expires lazily so that a stale entry's `Last-Modified` token survives
//! long enough for a conditional request.
//!
//! The cache itself is not synchronised. [`ChanClient`](crate::ChanClient)
//! owns the only instance behind a `parking_lot::Mutex` that is never held
//! across an `.await`.

mod ttl;

pub use ttl::{CacheEntry, CacheStats, TtlCache};

use crate::{ExplorerError, Result};

/// Default maximum number of cached documents.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Configuration for the response cache.
///
/// ```rust
/// # use imgboard_explorer::CacheConfig;
/// let config = CacheConfig::new().max_entries(500);
/// assert_eq!(config.max_entries, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 100.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    /// Create a new config with the default capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }

    /// Reject configurations the cache cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(ExplorerError::Configuration(
                "cache max_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
