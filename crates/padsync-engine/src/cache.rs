//! Write-coalescing cache
//!
//! Editors save on every keystroke burst; writing the durable queue once
//! per save would hammer the metadata store. The [`WriteCache`] absorbs
//! those notifications in memory instead: appends are O(1) with no lookups,
//! and deduplication is deferred to the moment the buffered entries are
//! folded into the sync queue.
//!
//! ## Crash tolerance
//!
//! The cache is serialized verbatim to a best-effort scratch store at
//! process teardown and read back (ahead of any newly observed events) at
//! the next startup for the same project. A corrupt payload is discarded
//! with a warning and the engine proceeds with an empty cache: only local
//! unsynced intent since the last teardown is lost, never remote state.
//! That loss is an accepted risk of the best-effort store, not a silent
//! failure mode.

use serde::{Deserialize, Serialize};
use tracing::debug;

use padsync_core::domain::{Operation, ProjectRoot, SyncPath, SyncQueue};

/// One buffered local-edit notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The project-relative path that changed
    pub path: SyncPath,
    /// The intention the change implies
    pub operation: Operation,
}

/// In-memory ordered buffer of not-yet-merged sync intentions
///
/// Entries are kept in arrival order and are *not* deduplicated on append;
/// for the same path, a later entry's merge semantics win when the buffer
/// is folded into the queue, however many times the path appears.
#[derive(Debug, Default)]
pub struct WriteCache {
    entries: Vec<CacheEntry>,
}

impl WriteCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scratch-store key scoping a project's buffered entries
    #[must_use]
    pub fn scratch_key(root: &ProjectRoot) -> String {
        format!("opcache:{root}")
    }

    /// Append one notification; O(1), no durability until fold-in or teardown
    pub fn push(&mut self, path: SyncPath, operation: Operation) {
        debug!(%path, %operation, "Buffering local change");
        self.entries.push(CacheEntry { path, operation });
    }

    /// Number of buffered entries (duplicates included)
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is buffered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every buffered entry in arrival order
    pub fn take_all(&mut self) -> Vec<CacheEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Put entries back ahead of anything buffered since they were taken
    ///
    /// Used when a fold-in could not be persisted (the batch returns to the
    /// buffer rather than being lost) and when restoring a serialized cache
    /// at startup, which must precede newly observed events.
    pub fn requeue_front(&mut self, mut batch: Vec<CacheEntry>) {
        if batch.is_empty() {
            return;
        }
        batch.append(&mut self.entries);
        self.entries = batch;
    }

    /// Fold every buffered entry into the queue's pending map, in arrival
    /// order, then clear the buffer
    ///
    /// Returns the number of entries folded.
    pub fn drain_into(&mut self, queue: &mut SyncQueue) -> usize {
        let batch = self.take_all();
        let folded = batch.len();
        for entry in batch {
            queue.push_pending(entry.path, entry.operation);
        }
        folded
    }

    /// Serialize the buffered entries for the scratch store
    ///
    /// Serialization of this shape cannot fail; an empty buffer serializes
    /// to an empty JSON array.
    #[must_use]
    pub fn to_payload(&self) -> Vec<u8> {
        serde_json::to_vec(&self.entries).unwrap_or_default()
    }

    /// Decode a scratch-store payload back into entries
    ///
    /// # Errors
    /// Returns the underlying JSON error for a corrupt payload; the caller
    /// decides to discard (and log) rather than propagate.
    pub fn decode_payload(bytes: &[u8]) -> Result<Vec<CacheEntry>, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
