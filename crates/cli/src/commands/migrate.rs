use atelier_core::config::{AppConfig, LoadOptions};
use atelier_db::{connect_with_settings, migrations, DbPool};

use crate::commands::{CommandResult, FailureKind};

const COMMAND: &str = "migrate";

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                FailureKind::ConfigValidation,
                format!("configuration issue: {error}"),
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                FailureKind::RuntimeInit,
                format!("failed to initialize async runtime: {error}"),
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| (FailureKind::DbConnectivity, error.to_string()))?;
        let before = applied_versions(&pool).await;
        migrations::run_pending(&pool)
            .await
            .map_err(|error| (FailureKind::Migration, error.to_string()))?;
        let after = applied_versions(&pool).await;
        pool.close().await;
        Ok::<usize, (FailureKind, String)>(after.saturating_sub(before))
    });

    match result {
        Ok(0) => CommandResult::ok(COMMAND, "schema already up to date"),
        Ok(applied) => {
            CommandResult::ok(COMMAND, format!("applied {applied} pending migration(s)"))
        }
        Err((kind, message)) => CommandResult::failure(COMMAND, kind, message),
    }
}

/// Count of recorded migrations; zero before the bookkeeping table exists.
async fn applied_versions(pool: &DbPool) -> usize {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await
        .map(|count| usize::try_from(count).unwrap_or(0))
        .unwrap_or(0)
}
