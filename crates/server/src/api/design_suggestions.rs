use atelier_core::domain::suggestion::{DesignSuggestion, SavedDesign, SavedDesignId, SuggestionId};
use atelier_core::errors::ApplicationError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::auth::CurrentUser;
use super::{new_correlation_id, ApiError, AppState};
use crate::workflow::{self, persistence};

pub async fn get_suggestion(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<DesignSuggestion>, ApiError> {
    let suggestion = workflow::owned_suggestion(&state, &identity, SuggestionId(id)).await?;
    Ok(Json(suggestion))
}

pub async fn save_design(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<SavedDesign>), ApiError> {
    let correlation_id = new_correlation_id();
    let saved = async {
        let suggestion = workflow::owned_suggestion(&state, &identity, SuggestionId(id)).await?;
        state.saved.save(identity.user_id, suggestion.id).await.map_err(persistence)
    }
    .await
    .map_err(|error| ApiError::new(error, correlation_id.clone()))?;

    info!(
        event_name = "design_suggestions.saved",
        correlation_id = %correlation_id,
        user_id = identity.user_id.0,
        suggestion_id = saved.design_suggestion_id.0,
        saved_design_id = saved.id.0,
        "design suggestion saved"
    );
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn list_saved(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<Json<Vec<DesignSuggestion>>, ApiError> {
    let saved = state.saved.list_saved_suggestions(identity.user_id).await.map_err(persistence)?;
    Ok(Json(saved))
}

/// `id` here is the saved-design row, not the suggestion.
pub async fn unsave_design(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .saved
        .delete_for_user(SavedDesignId(id), identity.user_id)
        .await
        .map_err(persistence)?;
    if !removed {
        return Err(ApplicationError::NotFound("Saved design".to_string()).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
