//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers and
//! paths. Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// SyncPath - rooted project-relative path
// ============================================================================

/// A project-relative file path, always rooted at `/`
///
/// Paths are the keys of the sync queue and the scope of file identities.
/// They are project-relative so that the same queue survives the project
/// being opened from a different workspace location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncPath(String);

impl SyncPath {
    /// Create a validated `SyncPath`
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidPath`] if the path is empty, is the bare
    /// root `/`, or does not start with `/`.
    pub fn new(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();

        if path.is_empty() {
            return Err(DomainError::InvalidPath("path is empty".to_string()));
        }
        if !path.starts_with('/') {
            return Err(DomainError::InvalidPath(format!(
                "path must be rooted at '/': {path}"
            )));
        }
        if path == "/" {
            return Err(DomainError::InvalidPath(
                "path must name a file, not the root".to_string(),
            ));
        }

        Ok(Self(path))
    }

    /// Get the path as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path component after the last `/`
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl Display for SyncPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SyncPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// ProjectRoot - identifies one project workspace
// ============================================================================

/// Absolute path of a project workspace on the local machine
///
/// The root scopes the persisted sync queue, the file identity table, and
/// the scratch-store key for the write cache. Two engines pointed at the
/// same root share the same persisted queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectRoot(PathBuf);

impl ProjectRoot {
    /// Create a validated `ProjectRoot`
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidProjectRoot`] if the path is not absolute.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();

        if !path.is_absolute() {
            return Err(DomainError::InvalidProjectRoot(format!(
                "project root must be absolute: {}",
                path.display()
            )));
        }

        Ok(Self(path))
    }

    /// Get the root as a `Path`
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Resolve a project-relative [`SyncPath`] to an absolute on-disk path
    #[must_use]
    pub fn resolve(&self, path: &SyncPath) -> PathBuf {
        self.0.join(path.as_str().trim_start_matches('/'))
    }
}

impl Display for ProjectRoot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

// ============================================================================
// FileId - remote-assigned file identity
// ============================================================================

/// Opaque identity assigned by the remote store when a file is first created
///
/// The identity correlates a local path with its remote record; it is
/// attached to subsequent updates and required to request a deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Create a validated `FileId`
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidFileId`] if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(DomainError::InvalidFileId("file id is empty".to_string()));
        }

        Ok(Self(id))
    }

    /// Get the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FileId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_path_valid() {
        let path = SyncPath::new("/index.html").unwrap();
        assert_eq!(path.as_str(), "/index.html");
        assert_eq!(path.file_name(), "index.html");
    }

    #[test]
    fn test_sync_path_nested_file_name() {
        let path = SyncPath::new("/css/style.css").unwrap();
        assert_eq!(path.file_name(), "style.css");
    }

    #[test]
    fn test_sync_path_rejects_unrooted() {
        assert!(SyncPath::new("index.html").is_err());
        assert!(SyncPath::new("").is_err());
        assert!(SyncPath::new("/").is_err());
    }

    #[test]
    fn test_sync_path_ordering_is_lexicographic() {
        let a = SyncPath::new("/a.txt").unwrap();
        let b = SyncPath::new("/b.txt").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_sync_path_serde_transparent() {
        let path = SyncPath::new("/a.txt").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"/a.txt\"");

        let back: SyncPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn test_project_root_requires_absolute() {
        assert!(ProjectRoot::new("/home/user/projects/7").is_ok());
        assert!(ProjectRoot::new("projects/7").is_err());
    }

    #[test]
    fn test_project_root_resolve() {
        let root = ProjectRoot::new("/home/user/projects/7").unwrap();
        let path = SyncPath::new("/css/style.css").unwrap();
        assert_eq!(
            root.resolve(&path),
            PathBuf::from("/home/user/projects/7/css/style.css")
        );
    }

    #[test]
    fn test_file_id_rejects_empty() {
        assert!(FileId::new("").is_err());
        assert!(FileId::new("   ").is_err());
        assert!(FileId::new("f-123").is_ok());
    }
}
