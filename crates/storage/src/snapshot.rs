//! Snapshot: one immutable, fully-formed metadata tree per version
//!
//! A snapshot maps version identifiers (e.g. `2015-07-25`, `latest`) to the
//! root value for that version. Snapshots are built wholesale by a source and
//! published as a unit; once published they are shared behind an `Arc` and
//! never change.
//!
//! # Version Aliases
//!
//! | Requested | Present as key | Resolves to |
//! |-----------|----------------|-------------|
//! | any | yes | that key |
//! | `latest` | no | byte-wise greatest key |
//! | anything else | no | `VersionNotFound` |

use metadir_core::{resolve, Environment, Error, Map, Result, Value};
use std::collections::BTreeMap;

/// Alias that falls back to the greatest version when not present.
pub const LATEST: &str = "latest";

/// An immutable set of version roots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    versions: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Create an empty snapshot (no versions).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a snapshot from version roots.
    pub fn new(versions: BTreeMap<String, Value>) -> Self {
        Snapshot { versions }
    }

    /// Build a snapshot from a tree whose top-level keys are versions.
    ///
    /// # Errors
    ///
    /// Returns `RefreshFailure` if `tree` is not an object.
    pub fn from_value(tree: Value) -> Result<Self> {
        match tree {
            Value::Object(map) => Ok(Snapshot::new(map)),
            other => Err(Error::RefreshFailure(format!(
                "snapshot root must be an object of versions, got {}",
                other.type_name()
            ))),
        }
    }

    /// Build a single-version snapshot from one environment.
    pub fn from_environment(version: &str, env: &Environment) -> Result<Self> {
        let mut versions = Map::new();
        versions.insert(version.to_string(), env.to_value()?);
        Ok(Snapshot::new(versions))
    }

    /// Version identifiers, in sorted order.
    pub fn versions(&self) -> Vec<&str> {
        self.versions.keys().map(String::as_str).collect()
    }

    /// Number of versions held.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Check if the snapshot holds no versions
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Root of an exact version key, without alias fallback.
    pub fn get(&self, version: &str) -> Option<&Value> {
        self.versions.get(version)
    }

    /// Resolve a requested version (including the `latest` fallback).
    ///
    /// Returns the concrete version key alongside its root.
    pub fn resolve_version<'a>(&'a self, requested: &str) -> Result<(&'a str, &'a Value)> {
        if let Some((key, root)) = self.versions.get_key_value(requested) {
            return Ok((key.as_str(), root));
        }
        if requested == LATEST {
            // BTreeMap<String, _> orders keys byte-wise
            if let Some((key, root)) = self.versions.iter().next_back() {
                return Ok((key.as_str(), root));
            }
        }
        Err(Error::VersionNotFound(requested.to_string()))
    }

    /// Resolve `path` under the requested version.
    ///
    /// # Errors
    ///
    /// `VersionNotFound` when the version does not resolve, `PathNotFound`
    /// when the path does not.
    pub fn lookup<S: AsRef<str>>(&self, version: &str, path: &[S]) -> Result<&Value> {
        let (_, root) = self.resolve_version(version)?;
        resolve(root, path).ok_or_else(|| {
            let joined: Vec<&str> = path.iter().map(|s| s.as_ref()).collect();
            Error::PathNotFound(format!("/{}", joined.join("/")))
        })
    }
}
