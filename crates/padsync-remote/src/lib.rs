//! Padsync Remote - Publish API client
//!
//! Typed HTTP client for the remote publish service and the
//! `IRemoteTransport` adapter built on top of it. The service stores one
//! record per project file; records are created and overwritten with
//! multipart `PUT`s and removed with `DELETE`s, both CSRF-protected.
//!
//! ## Key Components
//!
//! - [`PublishClient`] - Raw HTTP surface: one method per endpoint
//! - [`PublishTransport`] - `IRemoteTransport` implementation that reads
//!   local bytes and resolves file identities itself

pub mod client;
pub mod transport;

pub use client::PublishClient;
pub use transport::PublishTransport;
