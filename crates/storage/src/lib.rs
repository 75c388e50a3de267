//! Storage layer for metadir
//!
//! This crate holds the published metadata and everything that reads or
//! replaces it:
//! - Snapshot: immutable version → tree mapping with `latest` alias resolution
//! - SnapshotStore: the single published snapshot, swapped atomically
//! - WaitCoordinator: long-poll waits with broadcast wake-up on publish
//! - SnapshotSource / FileSource / Refresher: the reload path

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod snapshot;
pub mod source;
pub mod store;
pub mod wait;

pub use snapshot::{Snapshot, LATEST};
pub use source::{FileSource, NoSource, Refresher, SnapshotSource, SourceFormat};
pub use store::SnapshotStore;
pub use wait::{WaitConfig, WaitCoordinator};
