//! Typed access to the upstream imageboard API.
//!
//! [`ChanApi`] is the seam between route handlers and the fetch core. Only
//! [`fetch_json`](ChanApi::fetch_json) is required; the typed accessors are
//! default methods that pick the right endpoint and freshness window and
//! deserialize the shared document into [`models`]. Handlers can therefore
//! be tested against a mock that returns canned JSON.

pub mod media;
pub mod models;

pub use media::{MediaKind, country_flag_url, format_bytes, image_url, media_kind, thumbnail_url};
pub use models::{Board, BoardList, CatalogPage, CatalogThread, Thread, ThreadPost};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{ExplorerError, Result};

/// Freshness windows for each kind of upstream document.
///
/// The board list barely changes, catalogs move every few seconds and
/// threads are the hottest documents of all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlPolicy {
    /// `/boards.json`. Default: 1 hour.
    pub boards: Duration,
    /// `/{board}/catalog.json`. Default: 30s.
    pub catalog: Duration,
    /// `/{board}/thread/{no}.json`. Default: 10s.
    pub thread: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            boards: Duration::from_secs(3600),
            catalog: Duration::from_secs(30),
            thread: Duration::from_secs(10),
        }
    }
}

/// Read-only access to the upstream API.
#[async_trait]
pub trait ChanApi: Send + Sync {
    /// Fetch the JSON document at `path`, allowing it to be `ttl` old.
    async fn fetch_json(&self, path: &str, ttl: Duration) -> Result<Arc<Value>>;

    /// Freshness windows used by the typed accessors.
    fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy::default()
    }

    /// All boards. A document without a `boards` key yields an empty list.
    async fn boards(&self) -> Result<Vec<Board>> {
        let path = "/boards.json";
        let payload = self.fetch_json(path, self.ttl_policy().boards).await?;
        let list: BoardList = decode(path, &payload)?;
        Ok(list.boards)
    }

    /// Catalog pages of one board.
    async fn catalog(&self, board: &str) -> Result<Vec<CatalogPage>> {
        validate_board(board)?;
        let path = format!("/{board}/catalog.json");
        let payload = self.fetch_json(&path, self.ttl_policy().catalog).await?;
        decode(&path, &payload)
    }

    /// One thread with all of its posts.
    async fn thread(&self, board: &str, no: u64) -> Result<Thread> {
        validate_board(board)?;
        if no == 0 {
            return Err(ExplorerError::InvalidInput(
                "thread number must be at least 1".to_string(),
            ));
        }
        let path = format!("/{board}/thread/{no}.json");
        let payload = self.fetch_json(&path, self.ttl_policy().thread).await?;
        decode(&path, &payload)
    }
}

/// Check a board name before it becomes part of a request path.
///
/// Board names are 1 to 10 lowercase ASCII letters or digits.
pub fn validate_board(board: &str) -> Result<()> {
    let valid = (1..=10).contains(&board.len())
        && board
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(ExplorerError::InvalidInput(format!(
            "invalid board name: {board:?}"
        )))
    }
}

/// Deserialize a shared document into a typed model.
fn decode<T: DeserializeOwned>(path: &str, payload: &Value) -> Result<T> {
    T::deserialize(payload).map_err(|source| ExplorerError::Decode {
        url: path.to_string(),
        source,
    })
}
