//! Admin listener and reload triggers.
//!
//! Reloads come from two places: `POST /v1/reload` on the admin listener and
//! `SIGHUP`. Both re-read the configured source and publish it; a failed
//! reload leaves the current snapshot in place.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, post},
    Router,
};
use metadir_storage::Refresher;
use tracing::{info, warn};

/// Build the admin router.
pub fn router(refresher: Refresher) -> Router {
    Router::new()
        .route("/favicon.ico", any(|| async { StatusCode::NOT_FOUND }))
        .route("/v1/reload", post(reload))
        .with_state(refresher)
}

async fn reload(State(refresher): State<Refresher>) -> Response {
    info!(target: "metadir::reload", "Received HTTP reload request");
    match run_reload(refresher).await {
        Ok(_) => (StatusCode::OK, "OK").into_response(),
        Err(message) => (StatusCode::INTERNAL_SERVER_ERROR, message).into_response(),
    }
}

/// Run a reload off the async workers; the source does blocking file I/O.
pub async fn run_reload(refresher: Refresher) -> Result<u64, String> {
    match tokio::task::spawn_blocking(move || refresher.reload()).await {
        Ok(Ok(generation)) => Ok(generation),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("reload task failed: {}", e)),
    }
}

/// Reload on every `SIGHUP` until the process exits.
#[cfg(unix)]
pub async fn watch_sighup(refresher: Refresher) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangups = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!(target: "metadir::reload", error = %e, "Cannot install SIGHUP handler");
            return;
        }
    };
    while hangups.recv().await.is_some() {
        info!(target: "metadir::reload", "Received SIGHUP");
        if let Err(e) = run_reload(refresher.clone()).await {
            warn!(target: "metadir::reload", error = %e, "Failed to reload data");
        }
    }
}

#[cfg(not(unix))]
pub async fn watch_sighup(_refresher: Refresher) {
    std::future::pending::<()>().await
}
