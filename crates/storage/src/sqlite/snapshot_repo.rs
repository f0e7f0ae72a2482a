use chrono::Utc;
use quiz_core::model::SessionSnapshot;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{SnapshotKey, SnapshotRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl SnapshotRepository for SqliteRepository {
    async fn get_snapshot(
        &self,
        key: &SnapshotKey,
    ) -> Result<Option<SessionSnapshot>, StorageError> {
        let row = sqlx::query("SELECT payload FROM quiz_snapshots WHERE key = ?1")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let payload: String = row.try_get("payload").map_err(ser)?;
        serde_json::from_str(&payload).map(Some).map_err(ser)
    }

    async fn put_snapshot(
        &self,
        key: &SnapshotKey,
        snapshot: &SessionSnapshot,
    ) -> Result<(), StorageError> {
        let payload = serde_json::to_string(snapshot).map_err(ser)?;

        sqlx::query(
            r"
                INSERT INTO quiz_snapshots (key, payload, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    payload = excluded.payload,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(key.as_str())
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn delete_snapshot(&self, key: &SnapshotKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM quiz_snapshots WHERE key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
