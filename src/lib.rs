//! metadir - versioned cluster metadata directory
//!
//! A read-only HTTP directory over a tree of cluster metadata. Clients fetch
//! `/{version}/{path}` as a plain-text listing or JSON, and can long-poll a
//! path until its value changes. Snapshots are replaced wholesale on reload.
//!
//! # Quick Start
//!
//! ```ignore
//! use metadir::{MetadataServer, ServerConfig};
//!
//! let mut config = ServerConfig::default();
//! config.source.path = Some("/var/lib/metadir/answers.json".into());
//! MetadataServer::new(config)?.run().await?;
//! ```
//!
//! # Architecture
//!
//! | Crate | Role |
//! |-------|------|
//! | `metadir-core` | values, path resolution, segment codec, renderers |
//! | `metadir-storage` | snapshot store, long-poll waits, reload sources |
//! | `metadir-server` | HTTP routes, config, CLI |

pub use metadir_core::{
    escape_segment, render, resolve, split_path, unescape_segment, Environment, Error, Format,
    Map, Result, Value,
};
pub use metadir_server::{AppState, MetadataServer, ServerConfig, ServerError, SourceConfig};
pub use metadir_storage::{
    FileSource, Refresher, Snapshot, SnapshotSource, SnapshotStore, SourceFormat, WaitConfig,
    WaitCoordinator, LATEST,
};
