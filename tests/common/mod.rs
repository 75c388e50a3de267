//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;

pub use metadir::{
    AppState, FileSource, MetadataServer, Refresher, ServerConfig, Snapshot, SnapshotSource,
    SnapshotStore, SourceFormat, Value, WaitConfig, WaitCoordinator,
};
pub use serde_json::json;

// ============================================================================
// Fixtures
// ============================================================================

/// The two-version tree most suites start from.
pub fn sample_tree() -> serde_json::Value {
    json!({
        "2015-07-25": {
            "hosts": [
                {"name": "h1", "state": "active", "labels": {"zone": "us-east"}},
                {"uuid": "u-2", "state": "inactive"}
            ],
            "self": {"host": {"name": "h1"}},
            "version": 1,
            "ratio": 0.5,
            "enabled": true,
            "nothing": null,
            "a key": "spaced"
        }
    })
}

pub fn snapshot(v: serde_json::Value) -> Snapshot {
    Snapshot::from_value(Value::from(v)).unwrap()
}

pub fn store_with(v: serde_json::Value) -> Arc<SnapshotStore> {
    Arc::new(SnapshotStore::with_snapshot(snapshot(v)))
}

/// Public router over `store`, with default wait limits.
pub fn router(store: &Arc<SnapshotStore>) -> Router {
    router_with(store, WaitConfig::default(), false)
}

pub fn router_with(store: &Arc<SnapshotStore>, wait: WaitConfig, enable_xff: bool) -> Router {
    metadir_server::handlers::router(AppState {
        store: Arc::clone(store),
        waits: WaitCoordinator::new(Arc::clone(store), wait),
        enable_xff,
    })
}

/// Write `content` to a fresh temp file.
pub fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub allow_origin: Option<String>,
    pub body: String,
}

pub async fn send(app: Router, method: Method, uri: &str, accept: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(accept) = accept {
        builder = builder.header("accept", accept);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    // Headers are copied out first so nothing borrows the response across
    // the body await.
    let (status, content_type, allow_origin) = {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .map(|v| v.to_str().unwrap().to_string())
        };
        (
            response.status(),
            header("content-type"),
            header("access-control-allow-origin"),
        )
    };
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        content_type,
        allow_origin,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None).await
}

pub async fn get_json(app: Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, Some("application/json")).await
}
