//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the sync engine
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IMetadataStore`] - Durable per-project metadata: the sync queue and
//!   remote file identities
//! - [`IScratchStore`] - Best-effort local scratch storage for the write
//!   cache's crash tolerance
//! - [`ILocalFileSystem`] - Local workspace file reads
//! - [`IRemoteTransport`] - The network call behind each sync operation

pub mod local_filesystem;
pub mod metadata_store;
pub mod remote_transport;
pub mod scratch_store;

pub use local_filesystem::ILocalFileSystem;
pub use metadata_store::IMetadataStore;
pub use remote_transport::IRemoteTransport;
pub use scratch_store::IScratchStore;
