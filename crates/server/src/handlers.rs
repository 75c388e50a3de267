//! Public metadata routes.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET\|HEAD /` | version listing, with `latest` synthesized when absent |
//! | `GET\|HEAD /{version}/{key...}` | path lookup, optionally long-polled |
//! | `/favicon.ico` | always 404 |
//!
//! Wait mode is `?wait=true&value=<last seen>`, with `maxWait=<seconds>`
//! as the timeout. `value` must be present for the request to wait.

use crate::negotiate::negotiate;
use axum::{
    extract::{ConnectInfo, Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use metadir_core::{escape_segment, render, split_path, unescape_segment, Format, Map, Value};
use metadir_storage::{Snapshot, SnapshotStore, WaitCoordinator, LATEST};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Shared state for the public routes.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub waits: WaitCoordinator,
    pub enable_xff: bool,
}

/// Query parameters that switch a lookup into wait mode.
#[derive(Debug, Default, Deserialize)]
struct WaitParams {
    wait: Option<String>,
    value: Option<String>,
    #[serde(rename = "maxWait")]
    max_wait: Option<String>,
}

impl WaitParams {
    /// The previously-seen value, if this request should wait.
    fn old_value(&self) -> Option<&str> {
        match (self.wait.as_deref(), self.value.as_deref()) {
            (Some("true"), Some(value)) => Some(value),
            _ => None,
        }
    }

    /// Unparseable or negative values count as "not given".
    fn max_wait(&self) -> Duration {
        let secs = self
            .max_wait
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0);
        Duration::from_secs(secs)
    }
}

/// Build the public router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/favicon.ico", any(not_found))
        .route("/", get(root))
        .route("/{*path}", get(metadata))
        .layer(middleware::map_response(allow_any_origin))
        .with_state(state)
}

async fn allow_any_origin(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn root(State(state): State<AppState>, req: Request) -> Response {
    let format = negotiate(req.headers());
    let client = client_ip(&req, state.enable_xff);
    debug!(target: "metadir::http", %client, version = "root", "OK: /");

    let snapshot = state.store.current();
    let mut listing = Map::new();
    for version in snapshot.versions() {
        listing.insert(version.to_string(), version_url(version));
    }
    // If latest isn't in the list, pretend it is
    listing
        .entry(LATEST.to_string())
        .or_insert_with(|| version_url(LATEST));

    respond_success(format, &Value::Object(listing))
}

fn version_url(version: &str) -> Value {
    Value::String(format!("/{}", escape_segment(version)))
}

async fn metadata(State(state): State<AppState>, req: Request) -> Response {
    let format = negotiate(req.headers());
    let client = client_ip(&req, state.enable_xff);
    let params = Query::<WaitParams>::try_from_uri(req.uri())
        .map(|Query(p)| p)
        .unwrap_or_default();

    let raw = req.uri().path().trim_start_matches('/');
    let raw_key = raw.split_once('/').map(|(_, key)| key).unwrap_or("");

    // One snapshot answers the whole request.
    let snapshot = state.store.current();
    let (version, path) = match parse_target(&snapshot, raw) {
        Ok(target) => target,
        Err(e) => return error_response(format, &e),
    };

    let display_key = format!("/{}", raw_key.trim_end_matches('/'));
    let old_value = params.old_value();
    let max_wait = params.max_wait();
    debug!(
        target: "metadir::http",
        %version,
        %client,
        wait = old_value.is_some(),
        old_value = old_value.unwrap_or(""),
        max_wait = max_wait.as_secs(),
        "Searching for: {}",
        display_key
    );

    let found = match old_value {
        Some(previous) => {
            // Waiters re-read the store on every check.
            drop(snapshot);
            state
                .waits
                .wait(&version, &path, previous, max_wait)
                .await
        }
        None => snapshot.lookup(&version, &path).ok().cloned(),
    };

    match found {
        Some(value) => {
            debug!(target: "metadir::http", %version, %client, "OK: {}", display_key);
            respond_success(format, &value)
        }
        None => {
            info!(target: "metadir::http", %version, %client, "Error: {}", display_key);
            respond_error(format, "Not found", StatusCode::NOT_FOUND)
        }
    }
}

/// Split `version/key...` and check the version against `snapshot`.
///
/// Fails with `MalformedPathSegment` or `VersionNotFound`.
fn parse_target(snapshot: &Snapshot, raw: &str) -> metadir_core::Result<(String, Vec<String>)> {
    let (raw_version, raw_key) = raw.split_once('/').unwrap_or((raw, ""));
    let version = unescape_segment(raw_version)?;
    snapshot.resolve_version(&version)?;
    let path = split_path(raw_key)?;
    Ok((version, path))
}

fn error_response(format: Format, error: &metadir_core::Error) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    respond_error(format, &error.to_string(), status)
}

/// Client address for logging: `X-Forwarded-For` when trusted, else the peer.
fn client_ip(req: &Request, enable_xff: bool) -> String {
    if enable_xff {
        if let Some(xff) = forwarded_for(req.headers()) {
            return xff;
        }
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default()
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn respond_success(format: Format, value: &Value) -> Response {
    match render(value, format) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, format.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!(target: "metadir::http", error = %e, "Failed to render response");
            respond_error(format, &e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Error envelope: `{code, message, type}` in JSON, the bare message in text.
fn respond_error(format: Format, message: &str, status: StatusCode) -> Response {
    let body = match format {
        Format::Text => format!("{}\n", message),
        Format::Json => {
            let envelope = serde_json::json!({
                "code": status.as_u16(),
                "message": message,
                "type": "error",
            });
            format!("{}\n", envelope)
        }
    };
    (status, [(header::CONTENT_TYPE, format.content_type())], body).into_response()
}
