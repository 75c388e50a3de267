//! SnapshotStore: the single published snapshot and its wake signal
//!
//! The store owns exactly one piece of shared mutable state: the pointer to
//! the current [`Snapshot`]. Readers clone the `Arc` and keep it for the length
//! of a request; a publish swaps the pointer and never touches a tree that a
//! reader may be holding.
//!
//! # Publish Ordering
//!
//! `publish` swaps the pointer under the write lock, THEN bumps the
//! generation on the watch channel. A waiter marks the generation as seen
//! BEFORE it reads the pointer. Together these guarantee a waiter either sees
//! the new snapshot on its read or is woken by the bump that follows it.

use crate::snapshot::Snapshot;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Holds the currently-published snapshot.
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
    generation: watch::Sender<u64>,
}

impl SnapshotStore {
    /// Create a store serving an empty snapshot at generation 0.
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::empty())
    }

    /// Create a store serving `snapshot` at generation 0.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let (generation, _) = watch::channel(0);
        SnapshotStore {
            current: RwLock::new(Arc::new(snapshot)),
            generation,
        }
    }

    /// Atomically replace the current snapshot and wake every waiter.
    ///
    /// Returns the new generation number.
    pub fn publish(&self, snapshot: Snapshot) -> u64 {
        let versions = snapshot.len();
        let previous = {
            let mut current = self.current.write();
            std::mem::replace(&mut *current, Arc::new(snapshot))
        };
        // Dropped outside the lock; the last reader frees the old tree.
        drop(previous);

        let mut generation = 0;
        self.generation.send_modify(|g| {
            *g += 1;
            generation = *g;
        });
        debug!(target: "metadir::store", generation, versions, "Published snapshot");
        generation
    }

    /// The live snapshot.
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read())
    }

    /// Version identifiers of the live snapshot, sorted.
    pub fn versions(&self) -> Vec<String> {
        self.current()
            .versions()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Number of publishes so far.
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Receiver that is notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    /// Receivers still subscribed, i.e. waiters currently suspended.
    pub fn subscribers(&self) -> usize {
        self.generation.receiver_count()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("generation", &self.generation())
            .field("versions", &self.versions())
            .field("subscribers", &self.subscribers())
            .finish()
    }
}
