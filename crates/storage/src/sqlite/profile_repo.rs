use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{ProfileKey, ProfileRecord, ProfileRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl ProfileRepository for SqliteRepository {
    async fn load_profile(&self, key: &ProfileKey) -> Result<Option<ProfileRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT data
            FROM profiles
            WHERE namespace = ?1 AND username = ?2
            ",
        )
        .bind(key.namespace())
        .bind(key.username())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let data: String = row
            .try_get("data")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let record: ProfileRecord = serde_json::from_str(&data)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        Ok(Some(record))
    }

    async fn save_profile(
        &self,
        key: &ProfileKey,
        record: &ProfileRecord,
    ) -> Result<(), StorageError> {
        let data = serde_json::to_string(record)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let updated_at = record.updated_at.unwrap_or_else(Utc::now);

        sqlx::query(
            r"
            INSERT INTO profiles (namespace, username, data, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(namespace, username) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key.namespace())
        .bind(key.username())
        .bind(data)
        .bind(updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
