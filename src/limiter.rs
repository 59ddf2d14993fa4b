//! Fixed-interval admission control for upstream requests.
//!
//! The upstream API asks clients to send at most one request per second.
//! [`RateLimiter::admit`] enforces that across every task in the process:
//! the "how long since the last admission, sleep the remainder, record now"
//! sequence runs under a `tokio::sync::Mutex` that stays locked while
//! sleeping. Tokio's mutex queues waiters in FIFO order, so callers are
//! admitted in arrival order and none can starve.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::telemetry;

/// Default spacing between two upstream requests.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Serialises admissions so that no two complete less than `interval` apart.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_admission: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting at most one caller per `interval`.
    ///
    /// A zero interval admits everyone immediately.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_admission: Mutex::new(None),
        }
    }

    /// Configured spacing between admissions.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the caller may issue a request.
    ///
    /// Suspends the calling task only; other tasks keep running. Returns the
    /// time spent sleeping (zero when the slot was already free). Time spent
    /// queueing behind other callers is not included.
    pub async fn admit(&self) -> Duration {
        let mut last = self.last_admission.lock().await;

        let mut waited = Duration::ZERO;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                waited = self.interval - elapsed;
                debug!(wait_ms = waited.as_millis() as u64, "rate limiting upstream request");
                tokio::time::sleep(waited).await;
            }
        }

        *last = Some(Instant::now());
        metrics::histogram!(telemetry::RATE_LIMIT_WAIT_SECONDS).record(waited.as_secs_f64());
        waited
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}
