//! Snapshot sources and the reload path
//!
//! A [`SnapshotSource`] produces a complete [`Snapshot`] on demand. The
//! [`Refresher`] couples a source with the store: on every reload (startup,
//! `POST /v1/reload`, SIGHUP) it loads a fresh snapshot and publishes it.
//!
//! A failed load never touches the published snapshot; stale-but-valid
//! data keeps being served and the error goes back to whoever asked.

use crate::snapshot::Snapshot;
use crate::store::SnapshotStore;
use metadir_core::{Environment, Error, Result, Value};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Something that can produce a complete snapshot.
pub trait SnapshotSource: Send + Sync {
    /// Short description used in log lines.
    fn describe(&self) -> String;

    /// Whether a load can be attempted at all (e.g. the cache file exists).
    fn is_available(&self) -> bool {
        true
    }

    /// Produce a new snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RefreshFailure` describing why no snapshot could be built.
    fn load(&self) -> Result<Snapshot>;
}

/// Layout of a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// `{ "<version>": <tree>, ... }`
    #[default]
    Tree,
    /// A single environment record, published under one version
    Environment,
}

/// Reads a snapshot from a JSON file on every load.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: SourceFormat,
    version: String,
}

impl FileSource {
    /// A source reading a `{version: tree}` file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource {
            path: path.into(),
            format: SourceFormat::Tree,
            version: crate::snapshot::LATEST.to_string(),
        }
    }

    /// A source reading a single environment, published under `version`.
    pub fn environment(path: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        FileSource {
            path: path.into(),
            format: SourceFormat::Environment,
            version: version.into(),
        }
    }

    /// Path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File layout expected.
    pub fn format(&self) -> SourceFormat {
        self.format
    }

    fn read(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| {
            Error::RefreshFailure(format!(
                "Failed to read snapshot file '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    fn parse_error(&self, e: serde_json::Error) -> Error {
        Error::RefreshFailure(format!(
            "Failed to parse snapshot file '{}': {}",
            self.path.display(),
            e
        ))
    }
}

impl SnapshotSource for FileSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn is_available(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> Result<Snapshot> {
        let content = self.read()?;
        match self.format {
            SourceFormat::Tree => {
                let tree: Value = serde_json::from_str(&content).map_err(|e| self.parse_error(e))?;
                Snapshot::from_value(tree)
            }
            SourceFormat::Environment => {
                let env: Environment =
                    serde_json::from_str(&content).map_err(|e| self.parse_error(e))?;
                let foreign = env.foreign_children();
                if foreign > 0 {
                    warn!(
                        target: "metadir::source",
                        environment = %env.uuid,
                        foreign,
                        "Snapshot file has children from other environments"
                    );
                }
                Snapshot::from_environment(&self.version, &env)
            }
        }
    }
}

/// Placeholder source used when nothing is configured; every load fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl SnapshotSource for NoSource {
    fn describe(&self) -> String {
        "none".to_string()
    }

    fn is_available(&self) -> bool {
        false
    }

    fn load(&self) -> Result<Snapshot> {
        Err(Error::RefreshFailure(
            "no snapshot source configured".to_string(),
        ))
    }
}

/// Loads from a source and publishes into a store.
#[derive(Clone)]
pub struct Refresher {
    store: Arc<SnapshotStore>,
    source: Arc<dyn SnapshotSource>,
}

impl Refresher {
    /// Couple `source` with `store`.
    pub fn new(store: Arc<SnapshotStore>, source: Arc<dyn SnapshotSource>) -> Self {
        Refresher { store, source }
    }

    /// The store being published into.
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Load a fresh snapshot and publish it.
    ///
    /// Returns the new store generation. On error the published snapshot is
    /// left as it was.
    pub fn reload(&self) -> Result<u64> {
        let snapshot = match self.source.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    target: "metadir::source",
                    source = %self.source.describe(),
                    error = %e,
                    "Reload failed, keeping current snapshot"
                );
                return Err(e);
            }
        };
        let versions = snapshot.len();
        let generation = self.store.publish(snapshot);
        info!(
            target: "metadir::source",
            source = %self.source.describe(),
            generation,
            versions,
            "Reloaded snapshot"
        );
        Ok(generation)
    }

    /// Startup fast path: load if the source is available, skip otherwise.
    ///
    /// Returns `Ok(None)` when there was nothing to load.
    pub fn load_on_start(&self) -> Result<Option<u64>> {
        if !self.source.is_available() {
            info!(
                target: "metadir::source",
                source = %self.source.describe(),
                "No snapshot to load on start"
            );
            return Ok(None);
        }
        self.reload().map(Some)
    }
}

impl std::fmt::Debug for Refresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refresher")
            .field("source", &self.source.describe())
            .field("generation", &self.store.generation())
            .finish()
    }
}
