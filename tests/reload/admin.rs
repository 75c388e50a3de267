//! `POST /v1/reload` against a file source that changes underneath.

use crate::common::*;
use axum::http::Method;
use std::sync::Arc;

fn refresher_for(path: &std::path::Path) -> (Arc<SnapshotStore>, Refresher) {
    let store = Arc::new(SnapshotStore::new());
    let refresher = Refresher::new(Arc::clone(&store), Arc::new(FileSource::new(path)));
    (store, refresher)
}

#[tokio::test]
async fn reload_publishes_new_file_contents() {
    let file = temp_file(r#"{"v1": {"state": "old"}}"#);
    let (store, refresher) = refresher_for(file.path());
    refresher.reload().unwrap();
    assert_eq!(get(router(&store), "/v1/state").await.body, "old");

    std::fs::write(file.path(), r#"{"v1": {"state": "new"}}"#).unwrap();
    let admin = metadir_server::reload::router(refresher.clone());
    let resp = send(admin, Method::POST, "/v1/reload", None).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "OK");
    assert_eq!(get(router(&store), "/v1/state").await.body, "new");
}

#[tokio::test]
async fn failed_reload_keeps_current_snapshot() {
    let file = temp_file(r#"{"v1": {"state": "good"}}"#);
    let (store, refresher) = refresher_for(file.path());
    refresher.reload().unwrap();
    let generation = store.generation();

    std::fs::write(file.path(), "{ not json").unwrap();
    let admin = metadir_server::reload::router(refresher.clone());
    let resp = send(admin, Method::POST, "/v1/reload", None).await;
    assert_eq!(resp.status, 500);
    assert!(resp.body.contains("Failed to parse snapshot file"), "{}", resp.body);

    assert_eq!(store.generation(), generation);
    assert_eq!(get(router(&store), "/v1/state").await.body, "good");
}

#[tokio::test]
async fn reload_with_missing_file_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let (store, refresher) = refresher_for(&dir.path().join("gone.json"));
    let admin = metadir_server::reload::router(refresher);
    let resp = send(admin, Method::POST, "/v1/reload", None).await;
    assert_eq!(resp.status, 500);
    assert!(resp.body.contains("Failed to read snapshot file"), "{}", resp.body);
    assert!(store.current().is_empty());
}

#[tokio::test]
async fn non_object_file_is_rejected() {
    let file = temp_file("[1, 2, 3]");
    let (store, refresher) = refresher_for(file.path());
    assert!(refresher.reload().is_err());
    assert!(store.current().is_empty());
}

#[tokio::test]
async fn reload_requires_post() {
    let file = temp_file("{}");
    let (_store, refresher) = refresher_for(file.path());
    let admin = metadir_server::reload::router(refresher);
    let resp = send(admin, Method::GET, "/v1/reload", None).await;
    assert_eq!(resp.status, 405);
}

#[tokio::test]
async fn admin_favicon_is_not_found() {
    let file = temp_file("{}");
    let (_store, refresher) = refresher_for(file.path());
    let admin = metadir_server::reload::router(refresher);
    let resp = get(admin, "/favicon.ico").await;
    assert_eq!(resp.status, 404);
}

#[tokio::test]
async fn environment_file_is_published_under_its_version() {
    let file = temp_file(
        r#"{
            "uuid": "env-1",
            "hosts": [
                {"name": "h1", "uuid": "host-1", "state": "active", "environment_uuid": "env-1"}
            ],
            "services": [
                {"name": "web", "stack_name": "app", "environment_uuid": "env-1"}
            ]
        }"#,
    );
    let store = Arc::new(SnapshotStore::new());
    let source = FileSource::environment(file.path(), "2016-07-29");
    let refresher = Refresher::new(Arc::clone(&store), Arc::new(source));
    refresher.reload().unwrap();

    assert_eq!(store.versions(), vec!["2016-07-29".to_string()]);
    assert_eq!(
        get(router(&store), "/2016-07-29/hosts/h1/state").await.body,
        "active"
    );
    assert_eq!(
        get(router(&store), "/latest/hosts/host-1/state").await.body,
        "active"
    );
    assert_eq!(get(router(&store), "/latest/services").await.body, "0=web\n");
    assert_eq!(get(router(&store), "/latest/uuid").await.body, "env-1");
}
