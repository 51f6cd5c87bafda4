//! The durable sync queue
//!
//! The [`SyncQueue`] is the persisted representation of everything a project
//! still owes the remote store. It has two slots:
//!
//! - `pending` — one outstanding intention per path, keyed by path. The map
//!   is ordered so that "pick the first pending path" is deterministic and
//!   crash recovery is reproducible.
//! - `current` — the single operation actively being executed, or the one
//!   that was in flight when the process last died.
//!
//! Invariant: a path appears in at most one of `pending` and `current`.
//! Entries move `pending → current` when the engine selects work and
//! `current → gone` (success) or `current → pending` (failure) when the
//! outcome is finalized.
//!
//! The queue itself is a pure data structure; reading and writing it
//! against the metadata store belongs to `padsync-engine`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::newtypes::SyncPath;
use super::operation::Operation;

/// A (path, operation) pair occupying the queue's `current` slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// The project-relative path being reconciled
    pub path: SyncPath,
    /// What to do with it
    pub operation: Operation,
}

/// Persisted per-project sync queue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncQueue {
    /// Backlog of paths needing sync, one operation per path
    #[serde(default)]
    pending: BTreeMap<SyncPath, Operation>,
    /// The operation being executed, or interrupted mid-execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current: Option<QueueEntry>,
}

impl SyncQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending (not yet attempted) operations
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// True when there is nothing pending and nothing in flight
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.pending.is_empty() && self.current.is_none()
    }

    /// The pending backlog
    #[must_use]
    pub fn pending(&self) -> &BTreeMap<SyncPath, Operation> {
        &self.pending
    }

    /// The in-flight (or interrupted) entry, if any
    #[must_use]
    pub fn current(&self) -> Option<&QueueEntry> {
        self.current.as_ref()
    }

    /// Record an intention for a path, merging with any pending one
    ///
    /// This is the only way entries enter `pending`: the merge policy
    /// guarantees at most one operation per path survives.
    pub fn push_pending(&mut self, path: SyncPath, operation: Operation) {
        let previous = self.pending.get(&path).copied();
        self.pending
            .insert(path, Operation::merge(previous, operation));
    }

    /// Move a specific pending entry into the `current` slot
    ///
    /// Returns a copy of the promoted entry, or `None` when the path is not
    /// pending. Must not be called while `current` is occupied.
    pub fn promote(&mut self, path: &SyncPath) -> Option<QueueEntry> {
        debug_assert!(self.current.is_none(), "promote with an entry in flight");

        let operation = self.pending.remove(path)?;
        let entry = QueueEntry {
            path: path.clone(),
            operation,
        };
        self.current = Some(entry.clone());
        Some(entry)
    }

    /// Move the first pending entry (in key order) into the `current` slot
    ///
    /// This is the default selection policy: deterministic, tie-broken by
    /// key order, so recovery after a crash is reproducible.
    pub fn promote_first(&mut self) -> Option<QueueEntry> {
        let path = self.pending.keys().next().cloned()?;
        self.promote(&path)
    }

    /// Discard the `current` entry after its operation succeeded
    pub fn finish_current(&mut self) -> Option<QueueEntry> {
        self.current.take()
    }

    /// Return the `current` entry to `pending` after its operation failed
    ///
    /// The entry is merged rather than inserted so a superseding intention
    /// that arrived meanwhile is never clobbered by the failed one.
    pub fn requeue_current(&mut self) -> Option<QueueEntry> {
        let entry = self.current.take()?;
        self.push_pending(entry.path.clone(), entry.operation);
        Some(entry)
    }

    /// Invariant check: no path occupies both `pending` and `current`
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        match &self.current {
            Some(entry) => !self.pending.contains_key(&entry.path),
            None => true,
        }
    }
}
