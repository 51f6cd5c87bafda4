//! Integration tests for raw publish client operations
//!
//! Verifies endpoint selection, CSRF handling, status acceptance, and
//! response parsing against a wiremock-based publish service mock.

use padsync_core::domain::{FileId, SyncPath};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

fn sync_path(s: &str) -> SyncPath {
    SyncPath::new(s).unwrap()
}

// ============================================================================
// Upload tests
// ============================================================================

#[tokio::test]
async fn test_create_hits_bare_files_endpoint() {
    let (server, client) = common::setup_publish_mock().await;
    common::mount_create(&server, 201, serde_json::json!("rec-1")).await;

    let id = client
        .upload_file(&sync_path("/index.html"), b"<html/>".to_vec(), None)
        .await
        .expect("Create failed");

    assert_eq!(id.as_str(), "rec-1");
}

#[tokio::test]
async fn test_overwrite_targets_the_existing_record() {
    let (server, client) = common::setup_publish_mock().await;
    common::mount_overwrite(&server, "rec-1", serde_json::json!("rec-1")).await;

    let existing = FileId::new("rec-1").unwrap();
    let id = client
        .upload_file(
            &sync_path("/index.html"),
            b"<html>v2</html>".to_vec(),
            Some(&existing),
        )
        .await
        .expect("Overwrite failed");

    assert_eq!(id, existing);
}

#[tokio::test]
async fn test_upload_accepts_200_and_201() {
    for status in [200_u16, 201] {
        let (server, client) = common::setup_publish_mock().await;
        common::mount_create(&server, status, serde_json::json!("rec-9")).await;

        client
            .upload_file(&sync_path("/a.txt"), b"x".to_vec(), None)
            .await
            .unwrap_or_else(|e| panic!("Upload with status {status} failed: {e:#}"));
    }
}

#[tokio::test]
async fn test_upload_normalizes_numeric_id() {
    let (server, client) = common::setup_publish_mock().await;
    common::mount_create(&server, 200, serde_json::json!(1234)).await;

    let id = client
        .upload_file(&sync_path("/a.txt"), b"x".to_vec(), None)
        .await
        .expect("Upload failed");

    assert_eq!(id.as_str(), "1234");
}

#[tokio::test]
async fn test_upload_error_status_carries_body() {
    let (server, client) = common::setup_publish_mock().await;
    Mock::given(method("PUT"))
        .and(path(format!("/projects/{}/files", common::TEST_PROJECT)))
        .respond_with(ResponseTemplate::new(507).set_body_string("project quota exceeded"))
        .mount(&server)
        .await;

    let err = client
        .upload_file(&sync_path("/big.bin"), vec![0; 64], None)
        .await
        .expect_err("507 must be an error");

    let msg = format!("{err:#}");
    assert!(msg.contains("507"), "missing status in: {msg}");
    assert!(msg.contains("quota"), "missing body in: {msg}");
}

#[tokio::test]
async fn test_upload_without_csrf_token_is_rejected() {
    // Only requests carrying the right token are mocked; a client with the
    // wrong token falls through to wiremock's default 404.
    let (server, _client) = common::setup_publish_mock().await;
    common::mount_create(&server, 200, serde_json::json!("rec-1")).await;

    let rogue = padsync_remote::PublishClient::new(server.uri(), common::TEST_PROJECT, "wrong");
    let result = rogue
        .upload_file(&sync_path("/a.txt"), b"x".to_vec(), None)
        .await;

    assert!(result.is_err());
}

// ============================================================================
// Delete tests
// ============================================================================

#[tokio::test]
async fn test_delete_succeeds_on_200() {
    let (server, client) = common::setup_publish_mock().await;
    common::mount_delete(&server, "rec-1", 200).await;

    client
        .delete_file(&FileId::new("rec-1").unwrap())
        .await
        .expect("Delete failed");
}

#[tokio::test]
async fn test_delete_surfaces_server_error() {
    let (server, client) = common::setup_publish_mock().await;
    common::mount_delete(&server, "rec-1", 500).await;

    let err = client
        .delete_file(&FileId::new("rec-1").unwrap())
        .await
        .expect_err("500 must be an error");
    assert!(format!("{err:#}").contains("500"));
}

#[tokio::test]
async fn test_delete_includes_date_updated_query() {
    let (server, client) = common::setup_publish_mock().await;
    Mock::given(method("DELETE"))
        .and(path(format!(
            "/projects/{}/files/rec-1",
            common::TEST_PROJECT
        )))
        .and(wiremock::matchers::query_param_contains(
            "dateUpdated",
            "T",
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .delete_file(&FileId::new("rec-1").unwrap())
        .await
        .expect("Delete failed");
}
