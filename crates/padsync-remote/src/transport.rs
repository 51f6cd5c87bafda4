//! IRemoteTransport adapter over the publish client
//!
//! The engine hands this adapter only a root and a path; the adapter reads
//! the file's current bytes through the filesystem port and resolves any
//! previously recorded identity through the metadata store, so a burst of
//! edits coalesced into one `Update` always ships the latest content to
//! the right remote record.

use std::sync::Arc;

use anyhow::Context;
use tracing::debug;

use padsync_core::domain::{FileId, ProjectRoot, SyncPath};
use padsync_core::ports::{ILocalFileSystem, IMetadataStore, IRemoteTransport};

use crate::client::PublishClient;

/// Publish-API-backed implementation of the remote transport port
pub struct PublishTransport {
    client: PublishClient,
    store: Arc<dyn IMetadataStore>,
    filesystem: Arc<dyn ILocalFileSystem>,
}

impl PublishTransport {
    /// Creates a transport from a configured client and its local ports
    pub fn new(
        client: PublishClient,
        store: Arc<dyn IMetadataStore>,
        filesystem: Arc<dyn ILocalFileSystem>,
    ) -> Self {
        Self {
            client,
            store,
            filesystem,
        }
    }
}

#[async_trait::async_trait]
impl IRemoteTransport for PublishTransport {
    async fn update(&self, root: &ProjectRoot, path: &SyncPath) -> anyhow::Result<FileId> {
        let bytes = self
            .filesystem
            .read_file(root, path)
            .await
            .with_context(|| format!("Cannot upload {path}: local read failed"))?;

        let existing = self
            .store
            .get_file_id(root, path)
            .await
            .with_context(|| format!("Cannot upload {path}: identity lookup failed"))?;

        self.client.upload_file(path, bytes, existing.as_ref()).await
    }

    async fn delete(&self, root: &ProjectRoot, path: &SyncPath) -> anyhow::Result<()> {
        let existing = self
            .store
            .get_file_id(root, path)
            .await
            .with_context(|| format!("Cannot delete {path}: identity lookup failed"))?;

        let Some(file_id) = existing else {
            // Never created remotely; there is nothing to remove.
            debug!(%path, "Delete for a path with no remote identity, nothing to do");
            return Ok(());
        };

        self.client.delete_file(&file_id).await
    }
}
