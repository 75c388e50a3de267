//! Error statuses and bodies.

use crate::common::*;

#[tokio::test]
async fn unknown_version() {
    let store = store_with(sample_tree());
    let resp = get(router(&store), "/bogus/hosts").await;
    assert_eq!(resp.status, 404);
    assert_eq!(resp.body, "Invalid version\n");
}

#[tokio::test]
async fn latest_on_empty_store_is_invalid_version() {
    let store = std::sync::Arc::new(SnapshotStore::new());
    let resp = get(router(&store), "/latest/anything").await;
    assert_eq!(resp.status, 404);
    assert_eq!(resp.body, "Invalid version\n");
}

#[tokio::test]
async fn missing_path() {
    let store = store_with(sample_tree());
    for uri in [
        "/2015-07-25/missing",
        "/2015-07-25/hosts/h9",
        "/2015-07-25/hosts/5",
        "/2015-07-25/version/deeper",
        "/2015-07-25/self//host",
    ] {
        let resp = get(router(&store), uri).await;
        assert_eq!(resp.status, 404, "{}", uri);
        assert_eq!(resp.body, "Not found\n", "{}", uri);
    }
}

#[tokio::test]
async fn malformed_escape_is_bad_request() {
    let store = store_with(sample_tree());
    let resp = get(router(&store), "/2015-07-25/%zz").await;
    assert_eq!(resp.status, 400);
    assert!(!resp.body.is_empty());

    let resp = get(router(&store), "/%zz/hosts").await;
    assert_eq!(resp.status, 400);
}

#[tokio::test]
async fn json_error_envelope() {
    let store = store_with(sample_tree());
    let resp = get_json(router(&store), "/2015-07-25/missing").await;
    assert_eq!(resp.status, 404);
    assert_eq!(resp.content_type.as_deref(), Some("application/json"));
    let parsed: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(
        parsed,
        json!({"code": 404, "message": "Not found", "type": "error"})
    );

    let resp = get_json(router(&store), "/bogus").await;
    let parsed: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(parsed["message"], "Invalid version");
}

#[tokio::test]
async fn favicon_is_not_found() {
    let store = store_with(sample_tree());
    let resp = get(router(&store), "/favicon.ico").await;
    assert_eq!(resp.status, 404);
}
