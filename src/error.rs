//! Explorer error types

/// Errors surfaced by the fetch/cache core.
///
/// A cache miss is never an error; it is an `Option::None` inside the cache
/// API. Everything here reaches the caller untouched: the core does not retry.
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    // Transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    // Upstream answered, but not with something we can use
    #[error("upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    // Caller errors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ExplorerError {
    /// HTTP status carried by an [`ExplorerError::Status`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ExplorerError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the upstream could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, ExplorerError::Http(_) | ExplorerError::Timeout(_))
    }

    /// Whether a later attempt might succeed.
    ///
    /// Transport failures, 429 and 5xx qualify. The core never acts on this;
    /// it exists for callers that implement their own backoff.
    pub fn is_transient(&self) -> bool {
        match self {
            ExplorerError::Http(_) | ExplorerError::Timeout(_) => true,
            ExplorerError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExplorerError::Timeout(err.to_string())
        } else {
            ExplorerError::Http(err.to_string())
        }
    }
}

/// Result type alias for explorer operations
pub type Result<T> = std::result::Result<T, ExplorerError>;
