//! Domain entities and business rules
//!
//! Pure domain logic with no I/O:
//! - [`newtypes`] - validated identifier and path wrappers
//! - [`operation`] - sync operations and the merge policy
//! - [`queue`] - the durable sync queue shape and its invariants
//! - [`errors`] - domain error types

pub mod errors;
pub mod newtypes;
pub mod operation;
pub mod queue;

pub use errors::DomainError;
pub use newtypes::{FileId, ProjectRoot, SyncPath};
pub use operation::Operation;
pub use queue::{QueueEntry, SyncQueue};
