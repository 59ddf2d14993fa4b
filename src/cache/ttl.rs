//! Bounded TTL + LRU cache for upstream JSON documents.
//!
//! Entries are kept in a [`LinkedHashMap`] whose order is recency of use:
//! the front holds the least recently used entry, the back the most recent.
//! A successful [`get`](TtlCache::get), a [`set`](TtlCache::set) and a
//! [`refresh`](TtlCache::refresh) move an entry to the back; eviction pops
//! the front.
//!
//! Expiry is lazy. A stale entry is never handed out by `get`, but it stays
//! in the map until it is replaced or evicted so that its revalidation token
//! can still be used for a conditional request via
//! [`get_entry`](TtlCache::get_entry). Stale entries are never touched, so
//! they drift towards the front and are the first to go under pressure.

use std::sync::Arc;
use std::time::Duration;

use linked_hash_map::LinkedHashMap;
use serde_json::Value;
use tokio::time::Instant;

use super::CacheConfig;
use crate::telemetry;

/// One cached upstream response.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Parsed response body, shared with every caller that received it.
    pub payload: Arc<Value>,
    /// The entry is stale from this instant on.
    pub expires_at: Instant,
    /// `Last-Modified` value reported by the upstream, if any.
    pub revalidation_token: Option<String>,
}

impl CacheEntry {
    fn new(payload: Arc<Value>, ttl: Duration, revalidation_token: Option<String>) -> Self {
        Self {
            payload,
            expires_at: expiry_from_now(ttl),
            revalidation_token,
        }
    }

    /// Whether the entry is past its expiry instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Roughly 30 years; stands in for "never" when `now + ttl` overflows.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn expiry_from_now(ttl: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(ttl)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Snapshot of cache statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub current_size: usize,
    pub capacity: usize,
}

/// In-memory TTL + LRU cache keyed by canonical request URL.
///
/// All methods take `&mut self`; the owner is responsible for locking.
pub struct TtlCache {
    map: LinkedHashMap<String, CacheEntry>,
    capacity: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl TtlCache {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`CacheConfig::validate`] first when
    /// the value comes from user input.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be > 0");
        Self {
            map: LinkedHashMap::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Create a cache from a validated configuration.
    pub fn from_config(config: &CacheConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self::new(config.max_entries))
    }

    /// Look up a fresh payload.
    ///
    /// Returns `None` when the key was never set or its entry is stale. A hit
    /// promotes the entry to most recently used; a stale entry is left where
    /// it is.
    pub fn get(&mut self, key: &str) -> Option<Arc<Value>> {
        let now = Instant::now();
        let fresh = matches!(self.map.get(key), Some(entry) if !entry.is_expired_at(now));
        if !fresh {
            self.misses += 1;
            return None;
        }
        self.hits += 1;
        self.map.get_refresh(key).map(|entry| Arc::clone(&entry.payload))
    }

    /// Peek at an entry, stale or not, without changing its recency.
    ///
    /// Only meant for deciding whether a conditional request is possible:
    /// callers must check [`CacheEntry::is_expired`] before using the
    /// payload as a response.
    pub fn get_entry(&self, key: &str) -> Option<CacheEntry> {
        self.map.get(key).cloned()
    }

    /// Insert or replace an entry, expiring `ttl` from now.
    ///
    /// A new key arriving at capacity evicts the least recently used entry.
    /// Replacing an existing key never evicts.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        payload: Arc<Value>,
        ttl: Duration,
        revalidation_token: Option<String>,
    ) {
        let key = key.into();
        if !self.map.contains_key(&key) {
            while self.map.len() >= self.capacity {
                match self.map.pop_front() {
                    Some((evicted, _)) => {
                        self.evictions += 1;
                        metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL).increment(1);
                        tracing::debug!(key = %evicted, "evicted least recently used entry");
                    }
                    None => break,
                }
            }
        }
        // insert() moves an existing key to the back as well
        self.map
            .insert(key, CacheEntry::new(payload, ttl, revalidation_token));
    }

    /// Push the expiry of an existing entry to `ttl` from now.
    ///
    /// Payload and token are kept. Returns `false` (and does nothing) when
    /// the key is absent.
    pub fn refresh(&mut self, key: &str, ttl: Duration) -> bool {
        match self.map.get_refresh(key) {
            Some(entry) => {
                entry.expires_at = expiry_from_now(ttl);
                true
            }
            None => false,
        }
    }

    /// Remove a key explicitly.
    pub fn remove(&mut self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Whether an entry (stale or fresh) is physically present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    /// Number of entries currently held, stale ones included.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            current_size: self.map.len(),
            capacity: self.capacity,
        }
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(super::DEFAULT_MAX_ENTRIES)
    }
}
