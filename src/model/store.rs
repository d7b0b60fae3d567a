//! Snapshot ownership and lazily built indexes.

use super::{Group, Snapshot, SnapshotIndex, SnapshotIndexBuilder};
use indexmap::IndexMap;
use std::cell::OnceCell;

/// Holds the current snapshot and its derived index.
///
/// The index is a pure cache: it is built on first use and dropped
/// whenever the snapshot is replaced or [`invalidate_index`] is called.
///
/// [`invalidate_index`]: SnapshotStore::invalidate_index
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshot: Option<Snapshot>,
    labels: IndexMap<String, String>,
    index: OnceCell<SnapshotIndex>,
    /// Incremented on every replace; lets callers detect stale results
    generation: u64,
}

impl SnapshotStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `snapshot`.
    #[must_use]
    pub fn with_snapshot(snapshot: Option<Snapshot>) -> Self {
        let mut store = Self::new();
        store.replace(snapshot);
        store
    }

    /// Set the permission label table used when building the index.
    #[must_use]
    pub fn with_labels(mut self, labels: IndexMap<String, String>) -> Self {
        self.labels = labels;
        self.index = OnceCell::new();
        self
    }

    /// Swap in a new snapshot, dropping every derived cache.
    pub fn replace(&mut self, snapshot: Option<Snapshot>) {
        self.snapshot = snapshot;
        self.index = OnceCell::new();
        self.generation += 1;
        tracing::info!(
            groups = self.groups().len(),
            generation = self.generation,
            "snapshot replaced"
        );
    }

    /// Drop the cached index; it is rebuilt on the next access.
    pub fn invalidate_index(&mut self) {
        self.index = OnceCell::new();
    }

    /// The current snapshot, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Whether a snapshot is loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    /// All groups; empty when nothing is loaded.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        self.snapshot
            .as_ref()
            .map(|s| s.groups.as_slice())
            .unwrap_or(&[])
    }

    /// The derived index, building it if necessary.
    pub fn index(&self) -> &SnapshotIndex {
        self.index.get_or_init(|| match &self.snapshot {
            Some(snapshot) => SnapshotIndexBuilder::new()
                .with_labels(self.labels.clone())
                .build(snapshot),
            None => SnapshotIndex::default(),
        })
    }

    /// Permission label table.
    #[must_use]
    pub fn labels(&self) -> &IndexMap<String, String> {
        &self.labels
    }

    /// Replace counter.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}
