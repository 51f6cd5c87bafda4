//! Remote transport port (driven/secondary port)
//!
//! One network call per sync operation. The transport owns request framing,
//! status handling, and any timeout policy; the engine only sees success or
//! an error. Both calls must surface failures as errors rather than panic
//! past the scheduler, because a transport error is always recoverable by
//! re-queuing the operation.

use crate::domain::{FileId, ProjectRoot, SyncPath};

#[async_trait::async_trait]
pub trait IRemoteTransport: Send + Sync {
    /// Upload the path's current local bytes to the remote store
    ///
    /// The transport reads the file itself (via the filesystem port) and
    /// attaches the previously recorded identity if one exists, so the
    /// remote store overwrites rather than duplicates. Returns the
    /// (possibly new) identity on success.
    async fn update(&self, root: &ProjectRoot, path: &SyncPath) -> anyhow::Result<FileId>;

    /// Request removal of the path's remote record
    ///
    /// A path with no recorded identity was never created remotely; the
    /// transport treats that as a successful no-op.
    async fn delete(&self, root: &ProjectRoot, path: &SyncPath) -> anyhow::Result<()>;
}
