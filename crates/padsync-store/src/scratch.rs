//! Flat-file implementation of IScratchStore
//!
//! One file per key under a dedicated directory. Keys are arbitrary
//! strings (they embed project root paths), so the filename is the hex
//! SHA-256 of the key rather than the key itself.
//!
//! The port contract is best-effort storage; this adapter still reports
//! errors honestly and leaves the recovery decision to the caller.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use padsync_core::ports::IScratchStore;

/// Scratch store writing each key's payload to its own file
pub struct FileScratchStore {
    dir: PathBuf,
}

impl FileScratchStore {
    /// Creates a scratch store rooted at the given directory
    ///
    /// The directory is created eagerly so later writes only contend with
    /// disk errors, not missing parents.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        let mut name = String::with_capacity(digest.len() * 2);
        for byte in digest {
            name.push_str(&format!("{byte:02x}"));
        }
        self.dir.join(name)
    }

    /// The directory payloads are written under
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait::async_trait]
impl IScratchStore for FileScratchStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        let path = self.path_for(key);
        tokio::fs::write(&path, value).await?;
        tracing::trace!(key, bytes = value.len(), "Wrote scratch payload");
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
