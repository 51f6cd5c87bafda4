//! SQLite implementation of IMetadataStore
//!
//! This module provides the concrete SQLite-based implementation of the
//! metadata store port defined in padsync-core. It handles all domain
//! type serialization/deserialization and SQL query construction.
//!
//! ## Type Mapping
//!
//! | Domain Type | SQL Type | Strategy                                   |
//! |-------------|----------|--------------------------------------------|
//! | ProjectRoot | TEXT     | Path string via `.to_string()`             |
//! | SyncPath    | TEXT     | Path string via `.as_str()` / `SyncPath::new()` |
//! | FileId      | TEXT     | String via `.as_str()` / `FileId::new()`   |
//! | SyncQueue   | TEXT     | serde_json document                        |
//!
//! The queue JSON is the durable truth for crash recovery. A stored
//! operation kind outside the known vocabulary is logged loudly and
//! decoded as `update` so the path's intent survives; a structurally
//! corrupt row is surfaced as an error rather than silently replaced,
//! because dropping it would drop recorded sync intent.

use sqlx::{Row, SqlitePool};

use padsync_core::domain::{FileId, ProjectRoot, SyncPath, SyncQueue};
use padsync_core::ports::IMetadataStore;

use crate::StoreError;

/// SQLite-based implementation of the metadata store port
///
/// Provides persistent storage for sync queues and remote file identities.
/// All operations are performed through a connection pool for concurrency.
pub struct SqliteMetadataStore {
    pool: SqlitePool,
}

impl SqliteMetadataStore {
    /// Creates a new store instance with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Decode a stored queue document, repairing unknown operation kinds
///
/// An operation kind outside `{update, delete}` in a stored row is an
/// internal-consistency defect. It is logged and decoded as `update` so
/// the path's recorded intent is never dropped. Structural corruption
/// (unparseable JSON, invalid paths) remains an error.
fn decode_queue(root: &str, json: &str) -> Result<SyncQueue, StoreError> {
    let strict_err = match serde_json::from_str::<SyncQueue>(json) {
        Ok(queue) => return Ok(queue),
        Err(e) => e,
    };

    let Ok(mut value) = serde_json::from_str::<serde_json::Value>(json) else {
        return Err(StoreError::SerializationError(format!(
            "Invalid queue JSON for root '{}': {}",
            root, strict_err
        )));
    };

    let mut repaired = false;

    if let Some(pending) = value.get_mut("pending").and_then(|v| v.as_object_mut()) {
        for (path, kind) in pending.iter_mut() {
            if !matches!(kind.as_str(), Some("update" | "delete")) {
                tracing::error!(
                    root,
                    path = %path,
                    kind = %kind,
                    "Unknown operation kind in stored queue, defaulting to update"
                );
                *kind = serde_json::Value::String("update".to_string());
                repaired = true;
            }
        }
    }

    if let Some(kind) = value.get_mut("current").and_then(|c| c.get_mut("operation")) {
        if !matches!(kind.as_str(), Some("update" | "delete")) {
            tracing::error!(
                root,
                kind = %kind,
                "Unknown operation kind in stored current slot, defaulting to update"
            );
            *kind = serde_json::Value::String("update".to_string());
            repaired = true;
        }
    }

    if !repaired {
        return Err(StoreError::SerializationError(format!(
            "Invalid queue JSON for root '{}': {}",
            root, strict_err
        )));
    }

    serde_json::from_value(value).map_err(|e| {
        StoreError::SerializationError(format!("Invalid queue JSON for root '{}': {}", root, e))
    })
}

#[async_trait::async_trait]
impl IMetadataStore for SqliteMetadataStore {
    async fn get_queue(&self, root: &ProjectRoot) -> anyhow::Result<SyncQueue> {
        let root_str = root.to_string();

        let row = sqlx::query("SELECT queue FROM sync_queues WHERE root = ?")
            .bind(&root_str)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from)?;

        let Some(row) = row else {
            // First contact with this root: nothing owed yet.
            return Ok(SyncQueue::new());
        };

        let queue_json: String = row.get("queue");
        Ok(decode_queue(&root_str, &queue_json)?)
    }

    async fn set_queue(&self, root: &ProjectRoot, queue: &SyncQueue) -> anyhow::Result<()> {
        let root_str = root.to_string();
        let queue_json = serde_json::to_string(queue).map_err(|e| {
            StoreError::SerializationError(format!("Failed to serialize queue: {}", e))
        })?;

        sqlx::query(
            "INSERT INTO sync_queues (root, queue) VALUES (?, ?) \
             ON CONFLICT(root) DO UPDATE SET \
               queue = excluded.queue, \
               updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        )
        .bind(&root_str)
        .bind(&queue_json)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;

        tracing::trace!(root = %root_str, pending = queue.pending_count(), "Saved sync queue");
        Ok(())
    }

    async fn get_file_id(
        &self,
        root: &ProjectRoot,
        path: &SyncPath,
    ) -> anyhow::Result<Option<FileId>> {
        let row = sqlx::query("SELECT file_id FROM file_ids WHERE root = ? AND path = ?")
            .bind(root.to_string())
            .bind(path.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from)?;

        match row {
            Some(row) => {
                let id_str: String = row.get("file_id");
                let id = FileId::new(&id_str).map_err(|e| {
                    StoreError::SerializationError(format!(
                        "Invalid FileId '{}' for path '{}': {}",
                        id_str, path, e
                    ))
                })?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    async fn set_file_id(
        &self,
        root: &ProjectRoot,
        path: &SyncPath,
        id: &FileId,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO file_ids (root, path, file_id) VALUES (?, ?, ?) \
             ON CONFLICT(root, path) DO UPDATE SET \
               file_id = excluded.file_id, \
               updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        )
        .bind(root.to_string())
        .bind(path.as_str())
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;

        tracing::trace!(%path, file_id = %id, "Recorded file identity");
        Ok(())
    }

    async fn remove_file_id(&self, root: &ProjectRoot, path: &SyncPath) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM file_ids WHERE root = ? AND path = ?")
            .bind(root.to_string())
            .bind(path.as_str())
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;

        tracing::trace!(%path, "Cleared file identity");
        Ok(())
    }
}
