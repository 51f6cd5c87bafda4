//! Integration tests for padsync-remote
//!
//! Uses wiremock to simulate the publish service and verifies end-to-end
//! behavior of the PublishClient and the PublishTransport adapter.

mod common;

mod test_file_operations;
mod test_transport;
