//! Padsync Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Operation`, `SyncQueue`, `QueueEntry`
//! - **Merge policy** - conflict resolution for pending operations on a path
//! - **Port definitions** - Traits for adapters: `IMetadataStore`,
//!   `IScratchStore`, `ILocalFileSystem`, `IRemoteTransport`
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external dependencies.
//! Ports define trait interfaces that adapter crates implement. The sync
//! engine in `padsync-engine` orchestrates domain entities through the ports.

pub mod config;
pub mod domain;
pub mod ports;
