use atelier_core::domain::suggestion::DesignSuggestion;
use atelier_core::domain::upload::{Upload, UploadId};
use atelier_core::errors::{ApplicationError, DomainError};
use atelier_core::media::{public_url, MediaError};
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::auth::CurrentUser;
use super::{new_correlation_id, ApiError, AppState, PageParams};
use crate::workflow::{self, persistence, UploadForm};

/// Upload as returned to clients, with the URL its image is served under.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadView {
    #[serde(flatten)]
    pub upload: Upload,
    pub file_url: String,
}

impl From<Upload> for UploadView {
    fn from(upload: Upload) -> Self {
        let file_url = public_url(&upload.file_path);
        Self { upload, file_url }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadCreated {
    pub upload: UploadView,
    pub suggestion: DesignSuggestion,
}

fn form_error(error: MultipartError, max_upload_bytes: usize) -> ApplicationError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        MediaError::TooLarge { size: max_upload_bytes.saturating_add(1), max: max_upload_bytes }
            .into()
    } else {
        DomainError::InvariantViolation(format!("unreadable upload form: {}", error.body_text()))
            .into()
    }
}

async fn read_form(
    multipart: &mut Multipart,
    max_upload_bytes: usize,
) -> Result<UploadForm, ApplicationError> {
    let mut form = UploadForm::default();
    while let Some(field) =
        multipart.next_field().await.map_err(|error| form_error(error, max_upload_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            form.file_name = field.file_name().map(str::to_string);
            form.bytes = field
                .bytes()
                .await
                .map_err(|error| form_error(error, max_upload_bytes))?
                .to_vec();
            continue;
        }

        let value = field.text().await.map_err(|error| form_error(error, max_upload_bytes))?;
        match name.as_str() {
            "cloth_type" => form.attributes.cloth_type = Some(value),
            "occasion" => form.attributes.occasion = Some(value),
            "gender" => form.attributes.gender = Some(value),
            "age_group" => form.attributes.age_group = Some(value),
            "budget_range" => form.attributes.budget_range = Some(value),
            "fabric_description" => form.fabric_description = Some(value),
            _ => {}
        }
    }
    Ok(form)
}

pub async fn create_upload(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadCreated>), ApiError> {
    let correlation_id = new_correlation_id();
    info!(
        event_name = "uploads.create.start",
        correlation_id = %correlation_id,
        user_id = identity.user_id.0,
        "receiving garment upload"
    );

    let result = async {
        let form = read_form(&mut multipart, state.max_upload_bytes).await?;
        workflow::process_upload(&state, &identity, form, &correlation_id).await
    }
    .await;

    let outcome = result.map_err(|error| ApiError::new(error, correlation_id.clone()))?;
    Ok((
        StatusCode::CREATED,
        Json(UploadCreated { upload: outcome.upload.into(), suggestion: outcome.suggestion }),
    ))
}

pub async fn list_my_uploads(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<UploadView>>, ApiError> {
    let uploads = state
        .uploads
        .list_for_user(identity.user_id, params.into())
        .await
        .map_err(persistence)?;
    Ok(Json(uploads.into_iter().map(UploadView::from).collect()))
}

pub async fn get_upload(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<UploadView>, ApiError> {
    let upload = workflow::owned_upload(&state, &identity, UploadId(id)).await?;
    Ok(Json(upload.into()))
}

pub async fn list_upload_suggestions(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<DesignSuggestion>>, ApiError> {
    let upload = workflow::owned_upload(&state, &identity, UploadId(id)).await?;
    let suggestions = state.suggestions.list_for_upload(upload.id).await.map_err(persistence)?;
    Ok(Json(suggestions))
}
