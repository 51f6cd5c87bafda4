//! Padsync Store - Local metadata persistence
//!
//! SQLite-backed storage for:
//! - The durable per-project sync queue
//! - Remote file identities, keyed by project root and path
//!
//! plus a flat-file scratch store used by the write cache for crash
//! tolerance.
//!
//! ## Architecture
//!
//! This crate implements the `IMetadataStore` and `IScratchStore` ports
//! from `padsync-core`. It is a driven (secondary) adapter in the
//! hexagonal architecture.
//!
//! ## Key Components
//!
//! - [`DatabasePool`] - Connection pool with migration support
//! - [`SqliteMetadataStore`] - `IMetadataStore` over SQLite
//! - [`FileScratchStore`] - `IScratchStore` over one file per key
//! - [`StoreError`] - Error types for store operations

pub mod pool;
pub mod repository;
pub mod scratch;

pub use pool::DatabasePool;
pub use repository::SqliteMetadataStore;
pub use scratch::FileScratchStore;

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Serialization or deserialization of domain types failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::QueryFailed(e.to_string())
    }
}
