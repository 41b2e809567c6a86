use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use tokio::sync::RwLock;

use atelier_core::domain::garment::ClothType;
use atelier_core::domain::stats::{CategoryCount, DashboardStats};
use atelier_core::domain::suggestion::{
    DesignSuggestion, NewDesignSuggestion, SavedDesign, SavedDesignId, SuggestionId,
};
use atelier_core::domain::upload::{NewUpload, Upload, UploadId};
use atelier_core::domain::user::UserId;

use super::{
    Page, RepositoryError, SavedDesignRepository, StatsRepository, SuggestionRepository,
    UploadRepository,
};

/// Process-local store that implements every repository over one lock, so
/// cascading deletes behave as they do against SQLite.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    uploads: BTreeMap<i64, Upload>,
    suggestions: BTreeMap<i64, DesignSuggestion>,
    saved: BTreeMap<i64, SavedDesign>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

fn paginate<T>(items: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    items.skip(page.skip as usize).take(page.limit as usize).collect()
}

fn newest_first(uploads: &BTreeMap<i64, Upload>) -> impl Iterator<Item = &Upload> {
    uploads.values().rev()
}

fn count_by<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut counts: Vec<CategoryCount> =
        counts.into_iter().map(|(value, count)| CategoryCount::new(value, count)).collect();
    counts.sort_by(|a, b| (Reverse(a.count), &a.value).cmp(&(Reverse(b.count), &b.value)));
    counts
}

#[async_trait::async_trait]
impl UploadRepository for InMemoryStore {
    async fn create(&self, upload: NewUpload) -> Result<Upload, RepositoryError> {
        let mut state = self.state.write().await;
        let id = state.allocate_id();
        let profile = upload.profile;
        let created = Upload {
            id: UploadId(id),
            user_id: upload.user_id,
            file_path: upload.file_path,
            cloth_type: profile.cloth_type,
            occasion: profile.occasion,
            gender: profile.gender,
            age_group: profile.age_group,
            budget_range: profile.budget_range,
            size_info: upload.size_info,
            created_at: Utc::now(),
        };
        state.uploads.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UploadId) -> Result<Option<Upload>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.uploads.get(&id.0).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<Upload>, RepositoryError> {
        let state = self.state.read().await;
        let owned = newest_first(&state.uploads).filter(|upload| upload.user_id == user_id);
        Ok(paginate(owned.cloned(), page))
    }

    async fn list_all(&self, page: Page) -> Result<Vec<Upload>, RepositoryError> {
        let state = self.state.read().await;
        Ok(paginate(newest_first(&state.uploads).cloned(), page))
    }

    async fn list_by_cloth_type(
        &self,
        cloth_type: ClothType,
    ) -> Result<Vec<Upload>, RepositoryError> {
        let state = self.state.read().await;
        Ok(newest_first(&state.uploads)
            .filter(|upload| upload.cloth_type == cloth_type)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.uploads.len() as i64)
    }

    async fn delete(&self, id: UploadId) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        if state.uploads.remove(&id.0).is_none() {
            return Ok(false);
        }

        let MemoryState { suggestions, saved, .. } = &mut *state;
        suggestions.retain(|_, suggestion| suggestion.upload_id != id);
        saved.retain(|_, row| suggestions.contains_key(&row.design_suggestion_id.0));
        Ok(true)
    }
}

#[async_trait::async_trait]
impl SuggestionRepository for InMemoryStore {
    async fn create(
        &self,
        suggestion: NewDesignSuggestion,
    ) -> Result<DesignSuggestion, RepositoryError> {
        let mut state = self.state.write().await;
        if !state.uploads.contains_key(&suggestion.upload_id.0) {
            return Err(RepositoryError::NotFound(format!(
                "upload {}",
                suggestion.upload_id.0
            )));
        }

        let id = state.allocate_id();
        let created = DesignSuggestion {
            id: SuggestionId(id),
            upload_id: suggestion.upload_id,
            user_id: suggestion.user_id,
            fields: suggestion.fields,
            description: suggestion.description,
            confidence_score: suggestion.confidence_score,
            created_at: Utc::now(),
        };
        state.suggestions.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(
        &self,
        id: SuggestionId,
    ) -> Result<Option<DesignSuggestion>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.suggestions.get(&id.0).cloned())
    }

    async fn list_for_upload(
        &self,
        upload_id: UploadId,
    ) -> Result<Vec<DesignSuggestion>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .suggestions
            .values()
            .filter(|suggestion| suggestion.upload_id == upload_id)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl SavedDesignRepository for InMemoryStore {
    async fn save(
        &self,
        user_id: UserId,
        suggestion_id: SuggestionId,
    ) -> Result<SavedDesign, RepositoryError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .saved
            .values()
            .find(|row| row.user_id == user_id && row.design_suggestion_id == suggestion_id)
        {
            return Ok(existing.clone());
        }
        if !state.suggestions.contains_key(&suggestion_id.0) {
            return Err(RepositoryError::NotFound(format!(
                "design suggestion {}",
                suggestion_id.0
            )));
        }

        let id = state.allocate_id();
        let saved = SavedDesign {
            id: SavedDesignId(id),
            user_id,
            design_suggestion_id: suggestion_id,
            saved_at: Utc::now(),
        };
        state.saved.insert(id, saved.clone());
        Ok(saved)
    }

    async fn list_saved_suggestions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<DesignSuggestion>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .saved
            .values()
            .rev()
            .filter(|row| row.user_id == user_id)
            .filter_map(|row| state.suggestions.get(&row.design_suggestion_id.0).cloned())
            .collect())
    }

    async fn delete_for_user(
        &self,
        id: SavedDesignId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let owned = state.saved.get(&id.0).is_some_and(|row| row.user_id == user_id);
        if owned {
            state.saved.remove(&id.0);
        }
        Ok(owned)
    }
}

#[async_trait::async_trait]
impl StatsRepository for InMemoryStore {
    async fn dashboard_stats(&self) -> Result<DashboardStats, RepositoryError> {
        let state = self.state.read().await;
        Ok(DashboardStats {
            total_uploads: state.uploads.len() as i64,
            cloth_types: count_by(state.uploads.values().map(|upload| upload.cloth_type.as_str())),
            occasions: count_by(state.uploads.values().map(|upload| upload.occasion.as_str())),
        })
    }
}
