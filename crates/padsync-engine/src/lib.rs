//! Padsync Engine - Durable sync queue engine
//!
//! Drains a per-project queue of `update`/`delete` operations against a
//! remote store, surviving crashes, network failures, and bursts of local
//! edits.
//!
//! ## Modules
//!
//! - [`cache`] - Write-coalescing cache absorbing rapid-fire local edits
//! - [`engine`] - The drain state machine (select, execute, finalize)
//! - [`scheduler`] - Periodic drive loop and lifecycle handle
//! - [`filesystem`] - Local workspace filesystem adapter
//!
//! ## Flow
//!
//! ```text
//! local edits ──→ WriteCache ──(fold-in)──→ SyncQueue ──→ SyncEngine
//!                                               │              │
//!                                        IMetadataStore  IRemoteTransport
//! ```

pub mod cache;
pub mod engine;
pub mod filesystem;
pub mod scheduler;

pub use cache::WriteCache;
pub use engine::{SyncEngine, SyncEvent};
pub use filesystem::TokioFileSystem;
pub use scheduler::EngineHandle;
