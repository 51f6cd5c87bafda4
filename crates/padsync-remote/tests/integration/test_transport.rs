//! Integration tests for the PublishTransport adapter
//!
//! Verifies that the transport reads local bytes, resolves prior file
//! identities, and maps the no-identity delete to a successful no-op.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use padsync_core::domain::{FileId, ProjectRoot, SyncPath, SyncQueue};
use padsync_core::ports::{ILocalFileSystem, IMetadataStore, IRemoteTransport};
use padsync_remote::{PublishClient, PublishTransport};

use crate::common;

/// Metadata store stub: only the file identity surface matters here
#[derive(Default)]
struct StubStore {
    file_ids: Mutex<HashMap<String, FileId>>,
}

impl StubStore {
    fn with_id(path: &str, id: &str) -> Self {
        let store = Self::default();
        store
            .file_ids
            .lock()
            .unwrap()
            .insert(path.to_string(), FileId::new(id).unwrap());
        store
    }
}

#[async_trait]
impl IMetadataStore for StubStore {
    async fn get_queue(&self, _root: &ProjectRoot) -> anyhow::Result<SyncQueue> {
        Ok(SyncQueue::new())
    }

    async fn set_queue(&self, _root: &ProjectRoot, _queue: &SyncQueue) -> anyhow::Result<()> {
        Ok(())
    }

    async fn get_file_id(
        &self,
        _root: &ProjectRoot,
        path: &SyncPath,
    ) -> anyhow::Result<Option<FileId>> {
        Ok(self.file_ids.lock().unwrap().get(path.as_str()).cloned())
    }

    async fn set_file_id(
        &self,
        _root: &ProjectRoot,
        path: &SyncPath,
        id: &FileId,
    ) -> anyhow::Result<()> {
        self.file_ids
            .lock()
            .unwrap()
            .insert(path.as_str().to_string(), id.clone());
        Ok(())
    }

    async fn remove_file_id(&self, _root: &ProjectRoot, path: &SyncPath) -> anyhow::Result<()> {
        self.file_ids.lock().unwrap().remove(path.as_str());
        Ok(())
    }
}

/// Filesystem stub serving fixed bytes per path
#[derive(Default)]
struct StubFileSystem {
    files: HashMap<String, Vec<u8>>,
}

impl StubFileSystem {
    fn with_file(path: &str, bytes: &[u8]) -> Self {
        let mut fs = Self::default();
        fs.files.insert(path.to_string(), bytes.to_vec());
        fs
    }
}

#[async_trait]
impl ILocalFileSystem for StubFileSystem {
    async fn read_file(&self, _root: &ProjectRoot, path: &SyncPath) -> anyhow::Result<Vec<u8>> {
        self.files
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such file: {path}"))
    }
}

fn root() -> ProjectRoot {
    ProjectRoot::new("/home/user/projects/314").unwrap()
}

fn sync_path(s: &str) -> SyncPath {
    SyncPath::new(s).unwrap()
}

#[tokio::test]
async fn test_update_without_identity_creates_record() {
    let (server, client) = common::setup_publish_mock().await;
    common::mount_create(&server, 201, serde_json::json!("fresh-1")).await;

    let transport = PublishTransport::new(
        client,
        Arc::new(StubStore::default()),
        Arc::new(StubFileSystem::with_file("/index.html", b"<html/>")),
    );

    let id = transport
        .update(&root(), &sync_path("/index.html"))
        .await
        .expect("Update failed");
    assert_eq!(id.as_str(), "fresh-1");
}

#[tokio::test]
async fn test_update_with_identity_overwrites_record() {
    let (server, client) = common::setup_publish_mock().await;
    common::mount_overwrite(&server, "rec-5", serde_json::json!("rec-5")).await;

    let transport = PublishTransport::new(
        client,
        Arc::new(StubStore::with_id("/index.html", "rec-5")),
        Arc::new(StubFileSystem::with_file("/index.html", b"<html>v2</html>")),
    );

    let id = transport
        .update(&root(), &sync_path("/index.html"))
        .await
        .expect("Update failed");
    assert_eq!(id.as_str(), "rec-5");
}

#[tokio::test]
async fn test_update_fails_when_local_read_fails() {
    let (_server, client) = common::setup_publish_mock().await;

    let transport = PublishTransport::new(
        client,
        Arc::new(StubStore::default()),
        Arc::new(StubFileSystem::default()),
    );

    let err = transport
        .update(&root(), &sync_path("/ghost.txt"))
        .await
        .expect_err("missing local file must fail the update");
    assert!(format!("{err:#}").contains("local read failed"));
}

#[tokio::test]
async fn test_delete_with_identity_calls_the_service() {
    let (server, client) = common::setup_publish_mock().await;
    common::mount_delete(&server, "rec-5", 200).await;

    let transport = PublishTransport::new(
        client,
        Arc::new(StubStore::with_id("/index.html", "rec-5")),
        Arc::new(StubFileSystem::default()),
    );

    transport
        .delete(&root(), &sync_path("/index.html"))
        .await
        .expect("Delete failed");
}

#[tokio::test]
async fn test_delete_without_identity_is_a_no_op() {
    // No delete endpoint mounted at all: any network call would 404.
    let (_server, client) = common::setup_publish_mock().await;

    let transport = PublishTransport::new(
        client,
        Arc::new(StubStore::default()),
        Arc::new(StubFileSystem::default()),
    );

    transport
        .delete(&root(), &sync_path("/never-created.txt"))
        .await
        .expect("Delete of an unknown path must succeed as a no-op");
}
