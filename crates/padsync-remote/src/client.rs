//! Publish service HTTP client
//!
//! Provides a typed HTTP client for the remote publish API. Handles CSRF
//! headers, multipart framing, and endpoint construction.
//!
//! ## Endpoints
//!
//! - `PUT  /projects/{project}/files` - create a file record
//! - `PUT  /projects/{project}/files/{id}` - overwrite an existing record
//! - `DELETE /projects/{project}/files/{id}` - remove a record
//!
//! Both `PUT` forms carry a multipart body with `dateUpdated`, `path`, and
//! the file bytes; both creation statuses (`200` and `201`) are accepted
//! and yield the record's identity.

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use padsync_core::domain::{DomainError, FileId, SyncPath};

/// Header carrying the CSRF token on every mutating request
const CSRF_HEADER: &str = "X-Csrf-Token";

/// Body of a successful file `PUT`
///
/// The service is loose about the identity's JSON type, so it is accepted
/// as a raw value and normalized to a string.
#[derive(Debug, Deserialize)]
struct FileRecordResponse {
    id: serde_json::Value,
}

/// HTTP client for the publish API, scoped to one remote project
pub struct PublishClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL of the publish service, without a trailing slash
    base_url: String,
    /// Remote project the file records belong to
    project_id: u64,
    /// CSRF token attached to every request
    csrf_token: String,
}

impl PublishClient {
    /// Creates a new client for one project on one publish host
    ///
    /// # Arguments
    /// * `host` - Base URL of the publish service (e.g. `https://publish.example.org`)
    /// * `project_id` - The remote project's numeric identifier
    /// * `csrf_token` - Token sent in the `X-Csrf-Token` header
    pub fn new(host: impl Into<String>, project_id: u64, csrf_token: impl Into<String>) -> Self {
        let mut base_url = host.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
            project_id,
            csrf_token: csrf_token.into(),
        }
    }

    /// The project this client publishes to
    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    fn files_url(&self, file_id: Option<&FileId>) -> String {
        match file_id {
            Some(id) => format!(
                "{}/projects/{}/files/{}",
                self.base_url, self.project_id, id
            ),
            None => format!("{}/projects/{}/files", self.base_url, self.project_id),
        }
    }

    /// Upload a file's current bytes, creating or overwriting its record
    ///
    /// Passing `existing` targets that record for overwrite; without it the
    /// service creates a new record. Either way the response carries the
    /// record's identity, which the caller must persist for later
    /// overwrites and deletion.
    ///
    /// # Errors
    /// Returns an error for network failures, non-2xx statuses, and
    /// responses missing a usable identity.
    pub async fn upload_file(
        &self,
        path: &SyncPath,
        bytes: Vec<u8>,
        existing: Option<&FileId>,
    ) -> Result<FileId> {
        let url = self.files_url(existing);
        debug!(%path, url = %url, bytes = bytes.len(), "Uploading file record");

        let form = Form::new()
            .text("dateUpdated", Utc::now().to_rfc3339())
            .text("path", path.as_str().to_string())
            .part(
                "file",
                Part::bytes(bytes).file_name(path.file_name().to_string()),
            );

        let response = self
            .client
            .put(&url)
            .header(CSRF_HEADER, &self.csrf_token)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Failed to PUT {url}"))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("File upload for {path} returned {status}: {body}");
        }

        let record: FileRecordResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse upload response for {path}"))?;

        file_id_from_value(record.id)
            .with_context(|| format!("Upload response for {path} carried no usable id"))
    }

    /// Remove a file record from the remote project
    ///
    /// # Errors
    /// Returns an error for network failures and non-2xx statuses.
    pub async fn delete_file(&self, file_id: &FileId) -> Result<()> {
        let url = format!(
            "{}?dateUpdated={}",
            self.files_url(Some(file_id)),
            Utc::now().to_rfc3339()
        );
        debug!(%file_id, url = %url, "Deleting file record");

        let response = self
            .client
            .delete(&url)
            .header(CSRF_HEADER, &self.csrf_token)
            .send()
            .await
            .with_context(|| format!("Failed to DELETE {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("File delete for id {file_id} returned {status}: {body}");
        }

        Ok(())
    }
}

/// Normalize the service's `id` value (string or number) to a [`FileId`]
fn file_id_from_value(value: serde_json::Value) -> Result<FileId, DomainError> {
    match value {
        serde_json::Value::String(s) => FileId::new(s),
        serde_json::Value::Number(n) => FileId::new(n.to_string()),
        other => Err(DomainError::InvalidFileId(format!(
            "unexpected id value: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_from_string_value() {
        let id = file_id_from_value(serde_json::json!("abc-123")).unwrap();
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn test_file_id_from_number_value() {
        let id = file_id_from_value(serde_json::json!(42)).unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_file_id_rejects_other_values() {
        assert!(file_id_from_value(serde_json::json!(null)).is_err());
        assert!(file_id_from_value(serde_json::json!({"id": 1})).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = PublishClient::new("https://publish.example.org/", 7, "token");
        assert_eq!(
            client.files_url(None),
            "https://publish.example.org/projects/7/files"
        );
    }
}
