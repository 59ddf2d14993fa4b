//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus); without
//! a recorder installed, all metric calls are no-ops.
//!
//! All metrics are prefixed with `imgboard_`. Counters end in `_total`,
//! histograms carry their unit (`_seconds`).

/// Fresh cache hits served without touching the network.
pub const CACHE_HITS_TOTAL: &str = "imgboard_cache_hits_total";

/// Lookups that had to go upstream (absent or stale entry).
pub const CACHE_MISSES_TOTAL: &str = "imgboard_cache_misses_total";

/// Entries dropped to make room for a new key.
pub const CACHE_EVICTIONS_TOTAL: &str = "imgboard_cache_evictions_total";

/// Upstream answered 304 and the cached payload was reused.
pub const REVALIDATIONS_TOTAL: &str = "imgboard_revalidations_total";

/// Requests sent upstream.
///
/// Labels: `status` (numeric HTTP status, or "error" on transport failure).
pub const UPSTREAM_REQUESTS_TOTAL: &str = "imgboard_upstream_requests_total";

/// Time spent queued in the rate limiter before a request was admitted.
pub const RATE_LIMIT_WAIT_SECONDS: &str = "imgboard_rate_limit_wait_seconds";
