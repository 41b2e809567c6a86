use chrono::Utc;

use atelier_core::domain::suggestion::{
    DesignSuggestion, SavedDesign, SavedDesignId, SuggestionId,
};
use atelier_core::domain::user::UserId;

use super::codec::{encode_timestamp, row_to_saved_design, row_to_suggestion};
use super::{RepositoryError, SavedDesignRepository};
use crate::DbPool;

pub struct SqlSavedDesignRepository {
    pool: DbPool,
}

impl SqlSavedDesignRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SavedDesignRepository for SqlSavedDesignRepository {
    async fn save(
        &self,
        user_id: UserId,
        suggestion_id: SuggestionId,
    ) -> Result<SavedDesign, RepositoryError> {
        sqlx::query(
            "INSERT INTO saved_designs (user_id, design_suggestion_id, saved_at)
             VALUES (?, ?, ?)
             ON CONFLICT(user_id, design_suggestion_id) DO NOTHING",
        )
        .bind(user_id.0)
        .bind(suggestion_id.0)
        .bind(encode_timestamp(Utc::now()))
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(
            "SELECT id, user_id, design_suggestion_id, saved_at
             FROM saved_designs
             WHERE user_id = ? AND design_suggestion_id = ?",
        )
        .bind(user_id.0)
        .bind(suggestion_id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_saved_design).transpose()?.ok_or_else(|| {
            RepositoryError::NotFound(format!("saved design for suggestion {}", suggestion_id.0))
        })
    }

    async fn list_saved_suggestions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<DesignSuggestion>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT s.id, s.upload_id, s.user_id, s.neck_design, s.sleeve_style,
                    s.embroidery_pattern, s.color_combination, s.border_style,
                    s.description, s.confidence_score, s.created_at
             FROM saved_designs sd
             JOIN design_suggestions s ON s.id = sd.design_suggestion_id
             WHERE sd.user_id = ?
             ORDER BY sd.saved_at DESC, sd.id DESC",
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_suggestion).collect()
    }

    async fn delete_for_user(
        &self,
        id: SavedDesignId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM saved_designs WHERE id = ? AND user_id = ?")
            .bind(id.0)
            .bind(user_id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
