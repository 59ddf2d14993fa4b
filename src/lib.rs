//! imgboard-explorer - fetch core for a read-only imageboard front-end
//!
//! This crate owns every interaction with the upstream JSON API: a bounded
//! LRU cache with per-entry freshness windows, a global rate limiter that
//! spaces upstream requests, and conditional revalidation through
//! `If-Modified-Since` / `304 Not Modified`. Route handlers depend on the
//! [`ChanApi`] trait and never see HTTP.
//!
//! # Example
//!
//! ```rust,no_run
//! use imgboard_explorer::{ChanApi, ChanClient};
//!
//! #[tokio::main]
//! async fn main() -> imgboard_explorer::Result<()> {
//!     let client = ChanClient::builder().build()?;
//!     client.start()?;
//!
//!     for board in client.boards().await? {
//!         println!("/{}/ - {}", board.board, board.title);
//!     }
//!
//!     let pages = client.catalog("v").await?;
//!     println!("{} catalog pages", pages.len());
//!
//!     client.close();
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod limiter;
pub mod telemetry;

// Re-export main types at crate root
pub use api::{ChanApi, TtlPolicy, models};
pub use cache::{CacheConfig, CacheEntry, CacheStats, TtlCache};
pub use client::{ChanClient, ClientBuilder, DEFAULT_BASE_URL, canonical_url};
pub use config::Config;
pub use error::{ExplorerError, Result};
pub use limiter::RateLimiter;
