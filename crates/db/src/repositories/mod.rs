use async_trait::async_trait;
use thiserror::Error;

use atelier_core::domain::garment::ClothType;
use atelier_core::domain::stats::DashboardStats;
use atelier_core::domain::suggestion::{
    DesignSuggestion, NewDesignSuggestion, SavedDesign, SavedDesignId, SuggestionId,
};
use atelier_core::domain::upload::{NewUpload, Upload, UploadId};
use atelier_core::domain::user::UserId;

mod codec;
pub mod memory;
pub mod saved_design;
pub mod stats;
pub mod suggestion;
pub mod upload;

pub use memory::InMemoryStore;
pub use saved_design::SqlSavedDesignRepository;
pub use stats::SqlStatsRepository;
pub use suggestion::SqlSuggestionRepository;
pub use upload::SqlUploadRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("{0} not found")]
    NotFound(String),
}

/// Offset pagination as exposed by the listing endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: Self::DEFAULT_LIMIT }
    }
}

#[async_trait]
pub trait UploadRepository: Send + Sync {
    async fn create(&self, upload: NewUpload) -> Result<Upload, RepositoryError>;
    async fn find_by_id(&self, id: UploadId) -> Result<Option<Upload>, RepositoryError>;
    /// Newest first.
    async fn list_for_user(&self, user_id: UserId, page: Page)
        -> Result<Vec<Upload>, RepositoryError>;
    /// Newest first.
    async fn list_all(&self, page: Page) -> Result<Vec<Upload>, RepositoryError>;
    async fn list_by_cloth_type(&self, cloth_type: ClothType)
        -> Result<Vec<Upload>, RepositoryError>;
    async fn count(&self) -> Result<i64, RepositoryError>;
    /// Removes the upload together with its suggestions and their saves.
    async fn delete(&self, id: UploadId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    async fn create(
        &self,
        suggestion: NewDesignSuggestion,
    ) -> Result<DesignSuggestion, RepositoryError>;
    async fn find_by_id(&self, id: SuggestionId)
        -> Result<Option<DesignSuggestion>, RepositoryError>;
    async fn list_for_upload(
        &self,
        upload_id: UploadId,
    ) -> Result<Vec<DesignSuggestion>, RepositoryError>;
}

#[async_trait]
pub trait SavedDesignRepository: Send + Sync {
    /// Saving the same suggestion twice returns the existing row.
    async fn save(
        &self,
        user_id: UserId,
        suggestion_id: SuggestionId,
    ) -> Result<SavedDesign, RepositoryError>;
    /// The saved suggestions themselves, most recently saved first.
    async fn list_saved_suggestions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<DesignSuggestion>, RepositoryError>;
    /// Deletes only when the row belongs to `user_id`.
    async fn delete_for_user(
        &self,
        id: SavedDesignId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn dashboard_stats(&self) -> Result<DashboardStats, RepositoryError>;
}
