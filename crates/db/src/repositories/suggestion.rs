use chrono::Utc;

use atelier_core::domain::suggestion::{DesignSuggestion, NewDesignSuggestion, SuggestionId};
use atelier_core::domain::upload::UploadId;

use super::codec::{encode_timestamp, row_to_suggestion, SUGGESTION_COLUMNS};
use super::{RepositoryError, SuggestionRepository};
use crate::DbPool;

pub struct SqlSuggestionRepository {
    pool: DbPool,
}

impl SqlSuggestionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SuggestionRepository for SqlSuggestionRepository {
    async fn create(
        &self,
        suggestion: NewDesignSuggestion,
    ) -> Result<DesignSuggestion, RepositoryError> {
        let fields = &suggestion.fields;
        let result = sqlx::query(
            "INSERT INTO design_suggestions
                (upload_id, user_id, neck_design, sleeve_style, embroidery_pattern,
                 color_combination, border_style, description, confidence_score, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(suggestion.upload_id.0)
        .bind(suggestion.user_id.0)
        .bind(&fields.neck_design)
        .bind(&fields.sleeve_style)
        .bind(&fields.embroidery_pattern)
        .bind(&fields.color_combination)
        .bind(&fields.border_style)
        .bind(&suggestion.description)
        .bind(suggestion.confidence_score.as_str())
        .bind(encode_timestamp(Utc::now()))
        .execute(&self.pool)
        .await?;

        let id = SuggestionId(result.last_insert_rowid());
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("design suggestion {}", id.0)))
    }

    async fn find_by_id(
        &self,
        id: SuggestionId,
    ) -> Result<Option<DesignSuggestion>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SUGGESTION_COLUMNS} FROM design_suggestions WHERE id = ?"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_suggestion).transpose()
    }

    async fn list_for_upload(
        &self,
        upload_id: UploadId,
    ) -> Result<Vec<DesignSuggestion>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SUGGESTION_COLUMNS} FROM design_suggestions
             WHERE upload_id = ?
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(upload_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_suggestion).collect()
    }
}

#[cfg(test)]
mod tests {
    use atelier_core::domain::garment::{ClothType, Occasion};
    use atelier_core::domain::suggestion::{ConfidenceScore, SuggestionId};

    use super::SqlSuggestionRepository;
    use crate::repositories::test_support::{migrated_pool, new_suggestion, new_upload};
    use crate::repositories::{
        RepositoryError, SqlUploadRepository, SuggestionRepository, UploadRepository,
    };

    #[tokio::test]
    async fn suggestion_round_trips_and_links_to_upload() {
        let pool = migrated_pool().await;
        let uploads = SqlUploadRepository::new(pool.clone());
        let suggestions = SqlSuggestionRepository::new(pool);

        let upload =
            uploads.create(new_upload(4, ClothType::Kurti, Occasion::Casual)).await.expect("upload");
        let created = suggestions
            .create(new_suggestion(upload.id, upload.user_id))
            .await
            .expect("create suggestion");

        assert_eq!(created.upload_id, upload.id);
        assert_eq!(created.confidence_score, ConfidenceScore::High);
        assert_eq!(suggestions.find_by_id(created.id).await.expect("find"), Some(created.clone()));
        assert_eq!(suggestions.list_for_upload(upload.id).await.expect("list"), vec![created]);
        assert_eq!(suggestions.find_by_id(SuggestionId(404)).await.expect("missing"), None);
    }

    #[tokio::test]
    async fn suggestion_requires_existing_upload() {
        let pool = migrated_pool().await;
        let uploads = SqlUploadRepository::new(pool.clone());
        let suggestions = SqlSuggestionRepository::new(pool);
        let upload =
            uploads.create(new_upload(1, ClothType::Saree, Occasion::Party)).await.expect("upload");

        let mut orphan = new_suggestion(upload.id, upload.user_id);
        orphan.upload_id.0 += 100;

        let error = suggestions.create(orphan).await.expect_err("foreign key should reject");
        assert!(matches!(error, RepositoryError::Database(_)));
    }

    #[tokio::test]
    async fn deleting_upload_cascades_to_suggestions() {
        let pool = migrated_pool().await;
        let uploads = SqlUploadRepository::new(pool.clone());
        let suggestions = SqlSuggestionRepository::new(pool);

        let upload =
            uploads.create(new_upload(2, ClothType::Shirt, Occasion::Office)).await.expect("upload");
        let suggestion =
            suggestions.create(new_suggestion(upload.id, upload.user_id)).await.expect("create");

        assert!(uploads.delete(upload.id).await.expect("delete"));
        assert_eq!(suggestions.find_by_id(suggestion.id).await.expect("find"), None);
        assert!(!uploads.delete(upload.id).await.expect("second delete"));
    }
}
