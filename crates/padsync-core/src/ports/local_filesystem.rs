//! Local filesystem port (driven/secondary port)
//!
//! The sync engine never touches the workspace filesystem itself; the
//! remote transport reads a path's current bytes at upload time through
//! this port, so a burst of edits coalesced into one `Update` always
//! ships the latest content.

use crate::domain::{ProjectRoot, SyncPath};

#[async_trait::async_trait]
pub trait ILocalFileSystem: Send + Sync {
    /// Read the entire current contents of a workspace file
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or cannot be read.
    async fn read_file(&self, root: &ProjectRoot, path: &SyncPath) -> anyhow::Result<Vec<u8>>;
}
