//! Tests for the typed [`ChanApi`] accessors.
//!
//! Handlers only see the trait, so a mock returning canned JSON is enough to
//! exercise endpoint selection, TTL policy and model decoding.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use imgboard_explorer::api::MediaKind;
use imgboard_explorer::{ChanApi, ChanClient, ExplorerError, Result, TtlPolicy};

// ============================================================================
// Mock API
// ============================================================================

/// Records every `(path, ttl)` it is asked for and answers with `payload`.
struct MockApi {
    payload: Value,
    calls: Mutex<Vec<(String, Duration)>>,
}

impl MockApi {
    fn new(payload: Value) -> Self {
        Self {
            payload,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, Duration)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ChanApi for MockApi {
    async fn fetch_json(&self, path: &str, ttl: Duration) -> Result<Arc<Value>> {
        self.calls.lock().push((path.to_string(), ttl));
        Ok(Arc::new(self.payload.clone()))
    }
}

fn sample_thread_json() -> Value {
    json!({
        "posts": [
            {
                "no": 123,
                "resto": 0,
                "com": "OP post",
                "tim": 1700000000000u64,
                "ext": ".webm",
                "filename": "clip",
                "fsize": 2097152
            },
            {"no": 124, "resto": 123, "com": ">>123 reply", "country": "FI"}
        ]
    })
}

// ============================================================================
// Endpoint and TTL selection
// ============================================================================

#[tokio::test]
async fn boards_uses_boards_endpoint_and_ttl() {
    let api = MockApi::new(json!({
        "boards": [
            {"board": "g", "title": "Technology", "ws_board": 1, "pages": 10, "per_page": 15},
            {"board": "b", "title": "Random", "ws_board": 0, "pages": 10, "per_page": 15}
        ]
    }));

    let boards = api.boards().await.unwrap();
    assert_eq!(boards.len(), 2);
    assert!(boards[0].is_worksafe());
    assert!(!boards[1].is_worksafe());

    assert_eq!(
        api.calls(),
        vec![("/boards.json".to_string(), Duration::from_secs(3600))]
    );
}

#[tokio::test]
async fn boards_without_key_is_empty() {
    let api = MockApi::new(json!({}));
    assert!(api.boards().await.unwrap().is_empty());
}

#[tokio::test]
async fn catalog_uses_catalog_endpoint_and_ttl() {
    let api = MockApi::new(json!([
        {"page": 1, "threads": [{"no": 1, "sub": "first", "replies": 3, "tim": 99, "ext": ".png"}]},
        {"page": 2, "threads": []}
    ]));

    let pages = api.catalog("v").await.unwrap();
    assert_eq!(pages.len(), 2);
    let thread = &pages[0].threads[0];
    assert_eq!(thread.sub.as_deref(), Some("first"));
    assert_eq!(thread.replies, Some(3));
    assert_eq!(
        thread.thumbnail_url("v").as_deref(),
        Some("https://i.4cdn.org/v/99s.jpg")
    );

    assert_eq!(
        api.calls(),
        vec![("/v/catalog.json".to_string(), Duration::from_secs(30))]
    );
}

#[tokio::test]
async fn thread_uses_thread_endpoint_and_ttl() {
    let api = MockApi::new(sample_thread_json());

    let thread = api.thread("v", 123).await.unwrap();
    assert_eq!(thread.posts.len(), 2);

    let op = thread.op().unwrap();
    assert!(op.is_op());
    assert_eq!(op.media_kind(), MediaKind::Video);
    assert_eq!(op.file_name().as_deref(), Some("clip.webm"));
    assert_eq!(op.file_size().as_deref(), Some("2.0 MB"));

    let reply = thread.post(124).unwrap();
    assert!(!reply.is_op());
    assert_eq!(
        reply.country_flag_url().as_deref(),
        Some("https://s.4cdn.org/image/country/fi.gif")
    );

    assert_eq!(
        api.calls(),
        vec![("/v/thread/123.json".to_string(), Duration::from_secs(10))]
    );
}

// ============================================================================
// Input validation
// ============================================================================

#[tokio::test]
async fn invalid_board_never_reaches_upstream() {
    let api = MockApi::new(json!([]));

    for board in ["", "V", "../etc", "a/b", "waytoolongname"] {
        let err = api.catalog(board).await.unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidInput(_)), "board {board:?}");
    }
    let err = api.thread("v?x=1", 1).await.unwrap_err();
    assert!(matches!(err, ExplorerError::InvalidInput(_)));

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn thread_zero_is_invalid() {
    let api = MockApi::new(sample_thread_json());
    let err = api.thread("v", 0).await.unwrap_err();
    assert!(matches!(err, ExplorerError::InvalidInput(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn wrong_shape_is_decode_error() {
    let api = MockApi::new(json!({"posts": 5}));
    let err = api.thread("v", 1).await.unwrap_err();
    assert!(matches!(err, ExplorerError::Decode { .. }));
}

// ============================================================================
// Through the real client
// ============================================================================

#[tokio::test]
async fn client_applies_configured_ttl_policy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v/thread/123.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_thread_json()))
        .expect(2)
        .mount(&server)
        .await;

    let client = ChanClient::builder()
        .base_url(server.uri())
        .rate_limit(Duration::ZERO)
        .ttl_policy(TtlPolicy {
            thread: Duration::from_millis(50),
            ..TtlPolicy::default()
        })
        .build()
        .unwrap();

    let first = client.thread("v", 123).await.unwrap();
    let cached = client.thread("v", 123).await.unwrap();
    assert_eq!(first, cached);

    tokio::time::sleep(Duration::from_millis(100)).await;
    client.thread("v", 123).await.unwrap();
}

#[tokio::test]
async fn client_missing_thread_is_not_found_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ChanClient::builder()
        .base_url(server.uri())
        .rate_limit(Duration::ZERO)
        .build()
        .unwrap();

    let err = client.thread("v", 999).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}
