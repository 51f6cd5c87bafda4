//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including validation failures and malformed identifiers.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid project-relative path format or content
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid project root format
    #[error("Invalid project root: {0}")]
    InvalidProjectRoot(String),

    /// Invalid remote file identity format
    #[error("Invalid file id: {0}")]
    InvalidFileId(String),

    /// Unknown sync operation kind encountered during decoding
    #[error("Unknown sync operation: {0}")]
    UnknownOperation(String),
}
