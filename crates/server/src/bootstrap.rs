use atelier_core::config::{AppConfig, ConfigError, LoadOptions};
use atelier_core::identity::IdentityVerifier;
use atelier_db::{connect_with_settings, migrations, DbPool};
use thiserror::Error;
use tracing::info;

use crate::api::AppState;
use crate::health::HealthState;
use crate::storage::UploadStorage;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub state: AppState,
}

impl Application {
    pub fn health_state(&self) -> HealthState {
        HealthState::new(self.db_pool.clone(), self.config.uploads.dir.clone())
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("upload directory could not be prepared: {0}")]
    Storage(#[source] std::io::Error),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let storage = UploadStorage::new(config.uploads.dir.clone());
    storage.ensure_dir().await.map_err(BootstrapError::Storage)?;
    info!(
        event_name = "system.bootstrap.storage_ready",
        correlation_id = "bootstrap",
        upload_dir = %storage.dir().display(),
        "upload directory ready"
    );

    let verifier = IdentityVerifier::new(
        config.identity.signing_secret.clone(),
        config.identity.max_token_age_secs,
    );
    let state =
        AppState::with_pool(db_pool.clone(), verifier, storage, config.uploads.max_upload_bytes);

    Ok(Application { config, db_pool, state })
}

#[cfg(test)]
mod tests {
    use atelier_core::config::{ConfigOverrides, LoadOptions};
    use atelier_core::domain::garment::{
        AgeGroup, BudgetRange, ClothType, GarmentProfile, Gender, Occasion,
    };
    use atelier_core::domain::upload::NewUpload;
    use atelier_core::domain::user::UserId;

    use crate::bootstrap::bootstrap;

    const SECRET: &str = "test-signing-secret-0123456789";

    fn valid_overrides(database_url: &str, uploads_dir: &std::path::Path) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                uploads_dir: Some(uploads_dir.to_path_buf()),
                identity_signing_secret: Some(SECRET.to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_with_short_signing_secret() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut options = valid_overrides("sqlite::memory:", temp.path());
        options.overrides.identity_signing_secret = Some("short".to_string());

        let result = bootstrap(options).await;

        let message = result.err().expect("error").to_string();
        assert!(message.contains("identity.signing_secret"), "{message}");
    }

    #[tokio::test]
    async fn bootstrap_prepares_schema_storage_and_state() {
        let temp = tempfile::tempdir().expect("tempdir");
        let uploads_dir = temp.path().join("media");
        let app = bootstrap(valid_overrides("sqlite::memory:?cache=shared", &uploads_dir))
            .await
            .expect("bootstrap should succeed with valid overrides");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('uploads', 'design_suggestions', 'saved_designs')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("expected tables to be available after bootstrap");
        assert_eq!(table_count, 3);
        assert!(uploads_dir.is_dir());

        let upload = app
            .state
            .uploads
            .create(NewUpload {
                user_id: UserId(1),
                file_path: uploads_dir.join("user_1_x.png").to_string_lossy().into_owned(),
                profile: GarmentProfile {
                    cloth_type: ClothType::Dress,
                    occasion: Occasion::Office,
                    gender: Gender::Female,
                    age_group: AgeGroup::Adult,
                    budget_range: BudgetRange::High,
                },
                size_info: None,
            })
            .await
            .expect("state should write through the pool");
        assert_eq!(app.state.uploads.count().await.expect("count"), 1);
        assert_eq!(upload.cloth_type, ClothType::Dress);

        app.db_pool.close().await;
    }
}
