//! JSON API for uploads, design suggestions, favorites and the admin
//! dashboard.
//!
//! - `POST   /api/uploads`                           upload a photo, get a suggestion
//! - `GET    /api/uploads/my-uploads`                caller's uploads
//! - `GET    /api/uploads/{id}`                      one upload
//! - `GET    /api/uploads/{id}/suggestions`          suggestions of an upload
//! - `GET    /api/design-suggestions/{id}`           one suggestion
//! - `POST   /api/design-suggestions/{id}/save`      save a favorite
//! - `DELETE /api/design-suggestions/{id}/save`      remove a saved favorite
//! - `GET    /api/design-suggestions/saved/list`     caller's favorites
//! - `GET    /api/admin/dashboard/stats`             aggregate counts
//! - `GET    /api/admin/uploads`                     every upload
//! - `GET    /api/admin/uploads/by-type/{cloth_type}`
//! - `GET    /api/admin/trending`

use std::sync::Arc;

use atelier_core::errors::{ApplicationError, InterfaceError};
use atelier_core::identity::IdentityVerifier;
use atelier_core::suggestions::SuggestionEngine;
use atelier_db::{
    DbPool, InMemoryStore, Page, SavedDesignRepository, SqlSavedDesignRepository,
    SqlStatsRepository, SqlSuggestionRepository, SqlUploadRepository, StatsRepository,
    SuggestionRepository, UploadRepository,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::storage::UploadStorage;

pub mod admin;
pub mod auth;
pub mod design_suggestions;
pub mod uploads;

/// Room for the non-file form fields on top of the image size limit.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct AppState {
    pub uploads: Arc<dyn UploadRepository>,
    pub suggestions: Arc<dyn SuggestionRepository>,
    pub saved: Arc<dyn SavedDesignRepository>,
    pub stats: Arc<dyn StatsRepository>,
    pub engine: SuggestionEngine,
    pub verifier: Arc<IdentityVerifier>,
    pub storage: UploadStorage,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn with_pool(
        db_pool: DbPool,
        verifier: IdentityVerifier,
        storage: UploadStorage,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            uploads: Arc::new(SqlUploadRepository::new(db_pool.clone())),
            suggestions: Arc::new(SqlSuggestionRepository::new(db_pool.clone())),
            saved: Arc::new(SqlSavedDesignRepository::new(db_pool.clone())),
            stats: Arc::new(SqlStatsRepository::new(db_pool)),
            engine: SuggestionEngine::new(),
            verifier: Arc::new(verifier),
            storage,
            max_upload_bytes,
        }
    }

    pub fn in_memory(
        verifier: IdentityVerifier,
        storage: UploadStorage,
        max_upload_bytes: usize,
    ) -> Self {
        let store = Arc::new(InMemoryStore::default());
        Self {
            uploads: store.clone(),
            suggestions: store.clone(),
            saved: store.clone(),
            stats: store,
            engine: SuggestionEngine::new(),
            verifier: Arc::new(verifier),
            storage,
            max_upload_bytes,
        }
    }
}

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES);
    let static_files = ServeDir::new(state.storage.dir());

    Router::new()
        .route("/", get(banner))
        .route("/api/uploads", post(uploads::create_upload))
        .route("/api/uploads/my-uploads", get(uploads::list_my_uploads))
        .route("/api/uploads/{id}", get(uploads::get_upload))
        .route("/api/uploads/{id}/suggestions", get(uploads::list_upload_suggestions))
        .route("/api/design-suggestions/saved/list", get(design_suggestions::list_saved))
        .route("/api/design-suggestions/{id}", get(design_suggestions::get_suggestion))
        .route(
            "/api/design-suggestions/{id}/save",
            post(design_suggestions::save_design).delete(design_suggestions::unsave_design),
        )
        .route("/api/admin/dashboard/stats", get(admin::dashboard_stats))
        .route("/api/admin/uploads", get(admin::list_uploads))
        .route("/api/admin/uploads/by-type/{cloth_type}", get(admin::uploads_by_type))
        .route("/api/admin/trending", get(admin::trending))
        .nest_service("/uploads", static_files)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(
                    event_name = "system.cors.invalid_origin",
                    correlation_id = "bootstrap",
                    origin = %origin,
                    "ignoring origin that is not a valid header value"
                );
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub version: String,
}

async fn banner() -> Json<Banner> {
    Json(Banner {
        message: "Atelier design suggestion API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl From<PageParams> for Page {
    fn from(params: PageParams) -> Self {
        Page::new(
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(Page::DEFAULT_LIMIT).min(MAX_PAGE_LIMIT),
        )
    }
}

pub fn new_correlation_id() -> String {
    format!("req-{}", Uuid::new_v4().simple())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl ApiError {
    pub fn new(error: ApplicationError, correlation_id: impl Into<String>) -> Self {
        Self(error.into_interface(correlation_id))
    }

    fn status(&self) -> StatusCode {
        match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            InterfaceError::Forbidden { .. } => StatusCode::FORBIDDEN,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        Self::new(error, new_correlation_id())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let correlation_id = self.0.correlation_id().to_string();

        if status.is_server_error() {
            error!(
                event_name = "api.request.failed",
                correlation_id = %correlation_id,
                status = %status,
                error = %self.0,
                "API request failed"
            );
        } else {
            warn!(
                event_name = "api.request.rejected",
                correlation_id = %correlation_id,
                status = %status,
                error = %self.0,
                "API request rejected"
            );
        }

        let body = ErrorBody { error: self.0.user_message(), correlation_id };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use atelier_core::domain::user::{Identity, UserId, UserRole};
    use atelier_core::identity::{IdentitySigner, IdentityVerifier};
    use atelier_core::media::DEFAULT_MAX_UPLOAD_BYTES;
    use chrono::Utc;
    use tempfile::TempDir;

    use super::AppState;
    use crate::storage::UploadStorage;

    pub const SECRET: &str = "test-signing-secret-0123456789";

    fn encoded(format: image::ImageFormat) -> Vec<u8> {
        let pixels = image::RgbImage::from_pixel(4, 4, image::Rgb([201, 148, 52]));
        let mut out = std::io::Cursor::new(Vec::new());
        pixels.write_to(&mut out, format).expect("encode sample image");
        out.into_inner()
    }

    pub fn png() -> Vec<u8> {
        encoded(image::ImageFormat::Png)
    }

    pub fn jpeg() -> Vec<u8> {
        encoded(image::ImageFormat::Jpeg)
    }

    pub fn memory_state() -> (AppState, TempDir) {
        let temp = tempfile::tempdir().expect("tempdir");
        let state = AppState::in_memory(
            IdentityVerifier::new(SECRET.to_string().into(), 3600),
            UploadStorage::new(temp.path()),
            DEFAULT_MAX_UPLOAD_BYTES,
        );
        (state, temp)
    }

    pub fn token(user_id: i64, role: UserRole) -> String {
        IdentitySigner::new(SECRET.to_string().into())
            .issue(Identity::new(UserId(user_id), role), Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::test_support::memory_state;
    use super::{router, Banner};

    #[tokio::test]
    async fn banner_reports_service_and_version() {
        let (state, _temp) = memory_state();
        let app = router(state, &["http://localhost:3000".to_string()]);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let banner: Banner = serde_json::from_slice(&body).expect("json");
        assert_eq!(banner.message, "Atelier design suggestion API");
        assert_eq!(banner.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn stored_files_are_served_statically() {
        let (state, temp) = memory_state();
        std::fs::write(temp.path().join("user_1_abc.png"), b"png-bytes").expect("write");
        let app = router(state, &[]);

        let response = app
            .oneshot(
                Request::builder().uri("/uploads/user_1_abc.png").body(Body::empty()).expect("req"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert_eq!(&body[..], b"png-bytes");
    }

    #[tokio::test]
    async fn cors_preflight_allows_configured_origin() {
        let (state, _temp) = memory_state();
        let app = router(state, &["http://localhost:5173".to_string()]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/uploads/my-uploads")
                    .header("origin", "http://localhost:5173")
                    .header("access-control-request-method", "GET")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|value| value.to_str().ok()),
            Some("http://localhost:5173")
        );
    }
}
