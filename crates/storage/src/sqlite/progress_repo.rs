use async_trait::async_trait;
use chrono::Utc;
use lingo_core::model::{UserId, UserProgress};

use super::SqliteRepository;
use super::mapping::{conn, map_progress_row};
use crate::repository::{ProgressRepository, StorageError, progress_to_json};

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(&self, user_id: &UserId) -> Result<Option<UserProgress>, StorageError> {
        let row = sqlx::query("SELECT progress FROM user_documents WHERE user_id = ?1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_progress_row).transpose()
    }

    async fn create_progress(
        &self,
        user_id: &UserId,
        progress: &UserProgress,
    ) -> Result<(), StorageError> {
        let document = progress_to_json(progress)?;
        let now = Utc::now();

        let res = sqlx::query(
            r"
            INSERT INTO user_documents (user_id, progress, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            ON CONFLICT(user_id) DO NOTHING
            ",
        )
        .bind(user_id.as_str())
        .bind(document)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(())
    }

    async fn update_progress(
        &self,
        user_id: &UserId,
        progress: &UserProgress,
    ) -> Result<(), StorageError> {
        let document = progress_to_json(progress)?;

        let res = sqlx::query(
            r"
            UPDATE user_documents
            SET progress = ?2, updated_at = ?3
            WHERE user_id = ?1
            ",
        )
        .bind(user_id.as_str())
        .bind(document)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
