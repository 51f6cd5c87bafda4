//! Shared test helpers for publish API integration tests
//!
//! Provides wiremock-based mock server setup for the publish service
//! endpoints. Each helper mounts the necessary mock endpoints and returns
//! a configured PublishClient pointing at the mock server.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use padsync_remote::PublishClient;

pub const TEST_PROJECT: u64 = 314;
pub const TEST_TOKEN: &str = "csrf-test-token";

/// Starts a mock publish server and a client pointed at it
pub async fn setup_publish_mock() -> (MockServer, PublishClient) {
    let server = MockServer::start().await;
    let client = PublishClient::new(server.uri(), TEST_PROJECT, TEST_TOKEN);
    (server, client)
}

/// Mounts a create endpoint (`PUT .../files`) answering with `id`
pub async fn mount_create(server: &MockServer, status: u16, id: serde_json::Value) {
    Mock::given(method("PUT"))
        .and(path(format!("/projects/{TEST_PROJECT}/files")))
        .and(header("X-Csrf-Token", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({ "id": id })))
        .mount(server)
        .await;
}

/// Mounts an overwrite endpoint (`PUT .../files/{id}`) answering with `id`
pub async fn mount_overwrite(server: &MockServer, file_id: &str, id: serde_json::Value) {
    Mock::given(method("PUT"))
        .and(path(format!("/projects/{TEST_PROJECT}/files/{file_id}")))
        .and(header("X-Csrf-Token", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": id })))
        .mount(server)
        .await;
}

/// Mounts a delete endpoint (`DELETE .../files/{id}`)
pub async fn mount_delete(server: &MockServer, file_id: &str, status: u16) {
    Mock::given(method("DELETE"))
        .and(path(format!("/projects/{TEST_PROJECT}/files/{file_id}")))
        .and(header("X-Csrf-Token", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
