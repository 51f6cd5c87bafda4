//! Local workspace filesystem adapter

use anyhow::Context;
use async_trait::async_trait;

use padsync_core::domain::{ProjectRoot, SyncPath};
use padsync_core::ports::ILocalFileSystem;

/// Reads project files from the local workspace with `tokio::fs`
#[derive(Debug, Default, Clone)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ILocalFileSystem for TokioFileSystem {
    async fn read_file(&self, root: &ProjectRoot, path: &SyncPath) -> anyhow::Result<Vec<u8>> {
        let full_path = root.resolve(path);
        tokio::fs::read(&full_path)
            .await
            .with_context(|| format!("Failed to read local file: {}", full_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.md"), b"hello").unwrap();

        let root = ProjectRoot::new(dir.path()).unwrap();
        let fs = TokioFileSystem::new();

        let bytes = fs
            .read_file(&root, &SyncPath::new("/readme.md").unwrap())
            .await
            .unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[tokio::test]
    async fn test_read_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = ProjectRoot::new(dir.path()).unwrap();
        let fs = TokioFileSystem::new();

        let result = fs
            .read_file(&root, &SyncPath::new("/nope.txt").unwrap())
            .await;
        assert!(result.is_err());
    }
}
