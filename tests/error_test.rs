use imgboard_explorer::{ExplorerError, Result};

fn decode_error() -> ExplorerError {
    let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    ExplorerError::Decode {
        url: "https://a.4cdn.org/boards.json".to_string(),
        source,
    }
}

#[test]
fn test_error_display() {
    let err = ExplorerError::Status {
        status: 404,
        url: "https://a.4cdn.org/v/thread/1.json".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("404"));
    assert!(msg.contains("/v/thread/1.json"));
}

#[test]
fn test_decode_error_keeps_source() {
    use std::error::Error;
    let err = decode_error();
    assert!(err.to_string().contains("boards.json"));
    assert!(err.source().is_some());
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(ExplorerError::InvalidInput("board".into()))
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn transient_errors() {
    assert!(ExplorerError::Http("connection refused".into()).is_transient());
    assert!(ExplorerError::Timeout("deadline".into()).is_transient());
    for status in [429, 500, 502, 503, 504] {
        let err = ExplorerError::Status {
            status,
            url: "u".into(),
        };
        assert!(err.is_transient(), "{status} should be transient");
    }
}

#[test]
fn permanent_errors() {
    for status in [304, 400, 403, 404] {
        let err = ExplorerError::Status {
            status,
            url: "u".into(),
        };
        assert!(!err.is_transient(), "{status} should be permanent");
    }
    assert!(!decode_error().is_transient());
    assert!(!ExplorerError::InvalidInput("x".into()).is_transient());
    assert!(!ExplorerError::Configuration("x".into()).is_transient());
}

#[test]
fn transport_is_distinct_from_status() {
    assert!(ExplorerError::Http("reset".into()).is_transport());
    assert!(ExplorerError::Timeout("slow".into()).is_transport());
    let status = ExplorerError::Status {
        status: 503,
        url: "u".into(),
    };
    assert!(!status.is_transport());
    assert_eq!(status.status(), Some(503));
    assert_eq!(ExplorerError::Http("reset".into()).status(), None);
}
