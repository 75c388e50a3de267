//! Initial load in `MetadataServer::new`.

use crate::common::*;
use std::path::PathBuf;

fn config_with_answers(path: PathBuf) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.source.path = Some(path);
    config
}

#[tokio::test]
async fn answers_file_is_loaded_on_start() {
    let file = temp_file(r#"{"2015-07-25": {"hosts": [{"name": "h1", "state": "active"}]}}"#);
    let server = MetadataServer::new(config_with_answers(file.path().to_path_buf())).unwrap();
    assert_eq!(server.store().versions(), vec!["2015-07-25".to_string()]);

    let resp = get(server.router(), "/").await;
    assert_eq!(resp.body, "2015-07-25\nlatest\n");
}

#[test]
fn malformed_answers_file_is_fatal() {
    let file = temp_file("{ nope");
    let err = MetadataServer::new(config_with_answers(file.path().to_path_buf())).unwrap_err();
    assert!(err.to_string().starts_with("Failed loading data from file"), "{}", err);
}

#[test]
fn missing_answers_file_starts_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = MetadataServer::new(config_with_answers(dir.path().join("none.json"))).unwrap();
    assert!(server.store().current().is_empty());
}

#[test]
fn no_source_starts_empty_and_reload_fails() {
    let server = MetadataServer::new(ServerConfig::default()).unwrap();
    assert!(server.store().current().is_empty());
    let err = server.refresher().reload().unwrap_err();
    assert_eq!(err.to_string(), "no snapshot source configured");
}
