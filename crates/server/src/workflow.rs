//! Request-independent steps behind the HTTP handlers: the upload pipeline
//! and ownership checks.

use std::path::Path;

use atelier_core::domain::garment::GarmentAttributes;
use atelier_core::domain::suggestion::{DesignSuggestion, NewDesignSuggestion, SuggestionId};
use atelier_core::domain::upload::{NewUpload, Upload, UploadId};
use atelier_core::domain::user::Identity;
use atelier_core::errors::{ApplicationError, DomainError};
use atelier_core::media::{stored_file_name, validate_image};
use atelier_db::RepositoryError;
use tracing::{info, warn};

use crate::api::AppState;

/// Message returned when a caller touches a record owned by someone else.
pub const NOT_OWNER_MESSAGE: &str = "Unauthorized";

#[derive(Clone, Debug, Default)]
pub struct UploadForm {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
    pub attributes: GarmentAttributes,
    pub fabric_description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct UploadOutcome {
    pub upload: Upload,
    pub suggestion: DesignSuggestion,
}

pub fn persistence(error: RepositoryError) -> ApplicationError {
    match error {
        RepositoryError::NotFound(what) => ApplicationError::NotFound(what),
        other => ApplicationError::Persistence(other.to_string()),
    }
}

/// Validate, store, persist, then generate and persist one suggestion.
/// Any failure after the file is stored leaves neither the file nor the
/// upload row behind.
pub async fn process_upload(
    state: &AppState,
    identity: &Identity,
    form: UploadForm,
    correlation_id: &str,
) -> Result<UploadOutcome, ApplicationError> {
    let profile = form.attributes.validate()?;
    let file_name = form.file_name.ok_or(DomainError::MissingAttribute("file"))?;
    let image = validate_image(&file_name, &form.bytes, state.max_upload_bytes)?;

    let stored_name = stored_file_name(identity.user_id, &image.extension);
    let path = state
        .storage
        .store(&stored_name, &form.bytes)
        .await
        .map_err(|error| ApplicationError::Storage(error.to_string()))?;

    let size_info = form
        .fabric_description
        .map(|description| description.trim().to_string())
        .filter(|description| !description.is_empty());
    let new_upload = NewUpload {
        user_id: identity.user_id,
        file_path: path.to_string_lossy().into_owned(),
        profile,
        size_info,
    };
    let upload = match state.uploads.create(new_upload).await {
        Ok(upload) => upload,
        Err(error) => {
            state.storage.discard(&path, correlation_id).await;
            return Err(persistence(error));
        }
    };

    let record = state.engine.generate(&GarmentAttributes::from(&upload));
    let new_suggestion = NewDesignSuggestion::from_record(upload.id, identity.user_id, record);
    let suggestion = match state.suggestions.create(new_suggestion).await {
        Ok(suggestion) => suggestion,
        Err(error) => {
            roll_back_upload(state, &upload, &path, correlation_id).await;
            return Err(persistence(error));
        }
    };

    info!(
        event_name = "uploads.processed",
        correlation_id,
        user_id = identity.user_id.0,
        upload_id = upload.id.0,
        suggestion_id = suggestion.id.0,
        confidence_score = suggestion.confidence_score.as_str(),
        "upload stored and design suggestion generated"
    );

    Ok(UploadOutcome { upload, suggestion })
}

async fn roll_back_upload(
    state: &AppState,
    upload: &Upload,
    path: &Path,
    correlation_id: &str,
) {
    if let Err(error) = state.uploads.delete(upload.id).await {
        warn!(
            event_name = "uploads.rollback_failed",
            correlation_id,
            upload_id = upload.id.0,
            error = %error,
            "upload row could not be removed after suggestion write failed"
        );
    }
    state.storage.discard(path, correlation_id).await;
}

pub async fn owned_upload(
    state: &AppState,
    identity: &Identity,
    id: UploadId,
) -> Result<Upload, ApplicationError> {
    let upload = state
        .uploads
        .find_by_id(id)
        .await
        .map_err(persistence)?
        .ok_or_else(|| ApplicationError::NotFound("Upload".to_string()))?;
    if upload.user_id != identity.user_id {
        return Err(ApplicationError::Forbidden(NOT_OWNER_MESSAGE.to_string()));
    }
    Ok(upload)
}

pub async fn owned_suggestion(
    state: &AppState,
    identity: &Identity,
    id: SuggestionId,
) -> Result<DesignSuggestion, ApplicationError> {
    let suggestion = state
        .suggestions
        .find_by_id(id)
        .await
        .map_err(persistence)?
        .ok_or_else(|| ApplicationError::NotFound("Suggestion".to_string()))?;
    if suggestion.user_id != identity.user_id {
        return Err(ApplicationError::Forbidden(NOT_OWNER_MESSAGE.to_string()));
    }
    Ok(suggestion)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use atelier_core::domain::garment::GarmentAttributes;
    use atelier_core::domain::suggestion::{
        ConfidenceScore, DesignSuggestion, NewDesignSuggestion, SuggestionId,
    };
    use atelier_core::domain::upload::UploadId;
    use atelier_core::domain::user::{Identity, UserId, UserRole};
    use atelier_core::errors::{ApplicationError, DomainError};
    use atelier_core::media::MediaError;
    use atelier_db::{RepositoryError, SuggestionRepository};

    use super::{owned_upload, process_upload, UploadForm};
    use crate::api::test_support::{memory_state, png};

    /// Accepts reads but fails every write.
    struct OfflineSuggestions;

    #[async_trait]
    impl SuggestionRepository for OfflineSuggestions {
        async fn create(
            &self,
            _suggestion: NewDesignSuggestion,
        ) -> Result<DesignSuggestion, RepositoryError> {
            Err(RepositoryError::Decode("suggestion store offline".to_string()))
        }

        async fn find_by_id(
            &self,
            _id: SuggestionId,
        ) -> Result<Option<DesignSuggestion>, RepositoryError> {
            Ok(None)
        }

        async fn list_for_upload(
            &self,
            _upload_id: UploadId,
        ) -> Result<Vec<DesignSuggestion>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    fn form(cloth_type: &str) -> UploadForm {
        UploadForm {
            file_name: Some("red-saree.png".to_string()),
            bytes: png(),
            attributes: GarmentAttributes::from_raw(
                cloth_type, "wedding", "female", "adult", "10000+",
            ),
            fabric_description: Some("  Banarasi silk, 6 yards ".to_string()),
        }
    }

    #[tokio::test]
    async fn upload_is_stored_persisted_and_suggested() {
        let (state, temp) = memory_state();
        let identity = Identity::new(UserId(4), UserRole::User);

        let outcome =
            process_upload(&state, &identity, form("Saree"), "test").await.expect("processed");

        assert_eq!(outcome.upload.user_id, UserId(4));
        assert_eq!(outcome.upload.size_info.as_deref(), Some("Banarasi silk, 6 yards"));
        assert!(outcome.upload.file_path.ends_with(".png"));
        assert!(std::path::Path::new(&outcome.upload.file_path).starts_with(temp.path()));
        assert_eq!(outcome.suggestion.upload_id, outcome.upload.id);
        assert_eq!(outcome.suggestion.confidence_score, ConfidenceScore::High);
        assert!(outcome.suggestion.description.contains("saree"));
    }

    #[tokio::test]
    async fn invalid_attribute_is_rejected_before_anything_is_stored() {
        let (state, temp) = memory_state();
        let identity = Identity::new(UserId(4), UserRole::User);

        let error = process_upload(&state, &identity, form("tuxedo"), "test")
            .await
            .expect_err("tuxedo is not a cloth type");

        assert!(matches!(
            error,
            ApplicationError::Domain(DomainError::InvalidAttribute { field: "cloth_type", .. })
        ));
        let stored = std::fs::read_dir(temp.path()).expect("read dir").count();
        assert_eq!(stored, 0);
    }

    #[tokio::test]
    async fn non_image_body_is_rejected() {
        let (state, _temp) = memory_state();
        let identity = Identity::new(UserId(4), UserRole::User);
        let mut form = form("kurti");
        form.bytes = b"not an image".to_vec();

        let error = process_upload(&state, &identity, form, "test").await.expect_err("rejected");
        assert_eq!(error, ApplicationError::Media(MediaError::InvalidImage));
    }

    #[tokio::test]
    async fn other_users_cannot_read_an_upload() {
        let (state, _temp) = memory_state();
        let owner = Identity::new(UserId(1), UserRole::User);
        let stranger = Identity::new(UserId(2), UserRole::User);
        let outcome = process_upload(&state, &owner, form("lehenga"), "test").await.expect("ok");

        let error = owned_upload(&state, &stranger, outcome.upload.id).await.expect_err("403");
        assert_eq!(error, ApplicationError::Forbidden("Unauthorized".to_string()));

        let found = owned_upload(&state, &owner, outcome.upload.id).await.expect("owner");
        assert_eq!(found.id, outcome.upload.id);
    }

    #[tokio::test]
    async fn failed_suggestion_write_removes_upload_and_file() {
        let (mut state, temp) = memory_state();
        state.suggestions = Arc::new(OfflineSuggestions);
        let identity = Identity::new(UserId(4), UserRole::User);

        let error = process_upload(&state, &identity, form("saree"), "test")
            .await
            .expect_err("suggestion write fails");

        assert!(matches!(error, ApplicationError::Persistence(_)));
        assert_eq!(state.uploads.count().await.expect("count"), 0);
        let stored = std::fs::read_dir(temp.path()).expect("read dir").count();
        assert_eq!(stored, 0);
    }
}
