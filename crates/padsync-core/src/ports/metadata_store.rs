//! Metadata store port (driven/secondary port)
//!
//! This module defines the interface for persisting per-project sync
//! metadata: the durable sync queue and the remote file identities.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific
//!   (SQLite, flat files, etc.) and don't need domain-level classification.
//! - The queue is read-modify-write: callers must load the latest persisted
//!   value immediately before mutating and writing it back, because the
//!   persisted queue is the one resource shared between engine instances
//!   pointed at the same project root.
//! - File identities are owned here, not by the engine; the engine only
//!   records and removes them around successful transport calls.

use crate::domain::{FileId, ProjectRoot, SyncPath, SyncQueue};

/// Port trait for durable per-project metadata storage
#[async_trait::async_trait]
pub trait IMetadataStore: Send + Sync {
    /// Load the sync queue for a project root
    ///
    /// A root with no persisted queue yet yields an empty queue, not an
    /// error.
    async fn get_queue(&self, root: &ProjectRoot) -> anyhow::Result<SyncQueue>;

    /// Persist the sync queue for a project root, replacing any prior value
    async fn set_queue(&self, root: &ProjectRoot, queue: &SyncQueue) -> anyhow::Result<()>;

    /// Look up the remote identity recorded for a path, if any
    async fn get_file_id(
        &self,
        root: &ProjectRoot,
        path: &SyncPath,
    ) -> anyhow::Result<Option<FileId>>;

    /// Record the remote identity for a path (insert or overwrite)
    async fn set_file_id(
        &self,
        root: &ProjectRoot,
        path: &SyncPath,
        id: &FileId,
    ) -> anyhow::Result<()>;

    /// Forget the remote identity for a path
    ///
    /// Removing an identity that was never recorded is not an error.
    async fn remove_file_id(&self, root: &ProjectRoot, path: &SyncPath) -> anyhow::Result<()>;
}
