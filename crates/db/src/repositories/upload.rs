use chrono::Utc;

use atelier_core::domain::garment::ClothType;
use atelier_core::domain::upload::{NewUpload, Upload, UploadId};
use atelier_core::domain::user::UserId;

use super::codec::{encode_timestamp, row_to_upload, UPLOAD_COLUMNS};
use super::{Page, RepositoryError, UploadRepository};
use crate::DbPool;

pub struct SqlUploadRepository {
    pool: DbPool,
}

impl SqlUploadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UploadRepository for SqlUploadRepository {
    async fn create(&self, upload: NewUpload) -> Result<Upload, RepositoryError> {
        let created_at = Utc::now();
        let profile = upload.profile;

        let result = sqlx::query(
            "INSERT INTO uploads
                (user_id, file_path, cloth_type, occasion, gender, age_group, budget_range,
                 size_info, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(upload.user_id.0)
        .bind(&upload.file_path)
        .bind(profile.cloth_type.as_str())
        .bind(profile.occasion.as_str())
        .bind(profile.gender.as_str())
        .bind(profile.age_group.as_str())
        .bind(profile.budget_range.as_str())
        .bind(&upload.size_info)
        .bind(encode_timestamp(created_at))
        .execute(&self.pool)
        .await?;

        let id = UploadId(result.last_insert_rowid());
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("upload {}", id.0)))
    }

    async fn find_by_id(&self, id: UploadId) -> Result<Option<Upload>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {UPLOAD_COLUMNS} FROM uploads WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_upload).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<Upload>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {UPLOAD_COLUMNS} FROM uploads
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(user_id.0)
        .bind(i64::from(page.limit))
        .bind(i64::from(page.skip))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_upload).collect()
    }

    async fn list_all(&self, page: Page) -> Result<Vec<Upload>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {UPLOAD_COLUMNS} FROM uploads
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(page.limit))
        .bind(i64::from(page.skip))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_upload).collect()
    }

    async fn list_by_cloth_type(
        &self,
        cloth_type: ClothType,
    ) -> Result<Vec<Upload>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {UPLOAD_COLUMNS} FROM uploads
             WHERE cloth_type = ?
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(cloth_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_upload).collect()
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM uploads")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn delete(&self, id: UploadId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM uploads WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
