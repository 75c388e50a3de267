//! Long-poll wait coordinator
//!
//! A waiter watches one `(version, path)` and returns as soon as the text
//! rendering of the value there differs from what the client last saw, or
//! when its timeout elapses, whichever comes first.
//!
//! # Wake Protocol
//!
//! Every publish wakes every waiter (broadcast); each waiter re-resolves its
//! own path and re-compares. There is no per-path filtering at publish time.
//! A periodic tick bounds how long a waiter can sleep so the timeout is
//! honoured even when nothing is published.
//!
//! Cancellation is by drop: when the HTTP layer drops the request future
//! (client went away), the waiter's receiver goes with it.

use crate::store::SnapshotStore;
use metadir_core::{render_text, Value};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

fn default_secs() -> u64 {
    60
}

fn default_max_secs() -> u64 {
    120
}

fn default_tick_ms() -> u64 {
    1000
}

/// Timeout policy for wait-mode requests.
///
/// Persisted in the server config under the `[wait]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Timeout used when the client asks for none (default: 60)
    #[serde(default = "default_secs")]
    pub default_secs: u64,
    /// Ceiling applied to client-supplied timeouts (default: 120)
    #[serde(default = "default_max_secs")]
    pub max_secs: u64,
    /// Longest a waiter sleeps between re-checks (default: 1000)
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            default_secs: default_secs(),
            max_secs: default_max_secs(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl WaitConfig {
    /// Zero means "use the default"; anything over the ceiling is cut to it.
    pub fn clamp(&self, requested: Duration) -> Duration {
        let max = Duration::from_secs(self.max_secs);
        if requested.is_zero() {
            Duration::from_secs(self.default_secs).min(max)
        } else {
            requested.min(max)
        }
    }

    fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

/// Blocks wait-mode lookups until a change or timeout.
#[derive(Debug, Clone)]
pub struct WaitCoordinator {
    store: Arc<SnapshotStore>,
    config: WaitConfig,
}

impl WaitCoordinator {
    /// Create a coordinator over `store`.
    pub fn new(store: Arc<SnapshotStore>, config: WaitConfig) -> Self {
        WaitCoordinator { store, config }
    }

    /// The timeout policy in force.
    pub fn config(&self) -> &WaitConfig {
        &self.config
    }

    /// Wait for the value at `path` under `version` to differ from `previous`.
    ///
    /// Returns `Some(value)` for a changed value, or for whatever is there
    /// when the (clamped) timeout runs out. Returns `None` when the path (or
    /// version) still does not resolve at the timeout. A missing path never
    /// ends the wait early.
    pub async fn wait<S: AsRef<str>>(
        &self,
        version: &str,
        path: &[S],
        previous: &str,
        timeout: Duration,
    ) -> Option<Value> {
        let timeout = self.config.clamp(timeout);
        let tick = self.config.tick();
        let start = Instant::now();
        let mut rx = self.store.subscribe();

        loop {
            // Mark seen before reading, so a publish from here on wakes us.
            let generation = *rx.borrow_and_update();
            let snapshot = self.store.current();
            let found = snapshot.lookup(version, path).ok();

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                trace!(target: "metadir::wait", generation, ?elapsed, "Wait timed out");
                return found.cloned();
            }
            if let Some(value) = found {
                if render_text(value) != previous {
                    trace!(target: "metadir::wait", generation, ?elapsed, "Value changed");
                    return Some(value.clone());
                }
            }
            drop(snapshot);

            let nap = (timeout - elapsed).min(tick);
            match tokio::time::timeout(nap, rx.changed()).await {
                Ok(Ok(())) => {}
                // Sender gone: no more publishes, fall back to ticking.
                Ok(Err(_)) => tokio::time::sleep(nap).await,
                Err(_) => {}
            }
        }
    }
}
