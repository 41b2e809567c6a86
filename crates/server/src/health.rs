use std::path::{Path, PathBuf};

use atelier_db::{connection::ping, DbPool};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

const READY: &str = "ready";
const DEGRADED: &str = "degraded";

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
    upload_dir: PathBuf,
}

impl HealthState {
    pub fn new(db_pool: DbPool, upload_dir: impl Into<PathBuf>) -> Self {
        Self { db_pool, upload_dir: upload_dir.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub database: HealthCheck,
    pub storage: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

/// Serves `/health` on its own port so probes bypass the API middleware.
pub async fn spawn(bind_address: &str, port: u16, state: HealthState) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router(state)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                error = %error,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = database_check(&state.db_pool).await;
    let storage = storage_check(&state.upload_dir).await;
    let ready = database.status == READY && storage.status == READY;

    let payload = HealthResponse {
        status: if ready { READY } else { DEGRADED },
        service: HealthCheck {
            status: READY,
            detail: "atelier-server runtime initialized".to_string(),
        },
        database,
        storage,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn database_check(pool: &DbPool) -> HealthCheck {
    match ping(pool).await {
        Ok(()) => HealthCheck { status: READY, detail: "database query succeeded".to_string() },
        Err(error) => {
            HealthCheck { status: DEGRADED, detail: format!("database query failed: {error}") }
        }
    }
}

async fn storage_check(dir: &Path) -> HealthCheck {
    match tokio::fs::metadata(dir).await {
        Ok(metadata) if metadata.is_dir() => HealthCheck {
            status: READY,
            detail: format!("upload directory `{}` available", dir.display()),
        },
        Ok(_) => HealthCheck {
            status: DEGRADED,
            detail: format!("upload path `{}` is not a directory", dir.display()),
        },
        Err(error) => HealthCheck {
            status: DEGRADED,
            detail: format!("upload directory `{}` unavailable: {error}", dir.display()),
        },
    }
}

#[cfg(test)]
mod tests {
    use atelier_db::connect_with_settings;
    use axum::{extract::State, http::StatusCode, Json};

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_returns_ready_when_dependencies_are_reachable() {
        let temp = tempfile::tempdir().expect("tempdir");
        let pool = connect_with_settings("sqlite::memory:?cache=shared", 1, 5)
            .await
            .expect("pool should connect");

        let (status, Json(payload)) =
            health(State(HealthState::new(pool.clone(), temp.path()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.database.status, "ready");
        assert_eq!(payload.storage.status, "ready");

        pool.close().await;
    }

    #[tokio::test]
    async fn health_degrades_when_database_is_closed() {
        let temp = tempfile::tempdir().expect("tempdir");
        let pool = connect_with_settings("sqlite::memory:?cache=shared", 1, 5)
            .await
            .expect("pool should connect");
        pool.close().await;

        let (status, Json(payload)) = health(State(HealthState::new(pool, temp.path()))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.database.status, "degraded");
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_degrades_when_upload_directory_is_missing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let pool = connect_with_settings("sqlite::memory:?cache=shared", 1, 5)
            .await
            .expect("pool should connect");

        let (status, Json(payload)) =
            health(State(HealthState::new(pool.clone(), temp.path().join("missing")))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.storage.status, "degraded");
        assert_eq!(payload.database.status, "ready");

        pool.close().await;
    }
}
