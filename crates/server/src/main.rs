use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use atelier_core::config::{AppConfig, LoadOptions};
use atelier_server::{api, bootstrap, health};
use tokio::sync::Notify;
use tracing::{error, info, warn};

fn init_logging(config: &AppConfig) {
    use atelier_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    let server = &app.config.server;

    health::spawn(&server.bind_address, server.health_check_port, app.health_state()).await?;

    let address = format!("{}:{}", server.bind_address, server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    let router = api::router(app.state.clone(), &server.allowed_origins)
        .merge(health::router(app.health_state()));

    let shutdown = Arc::new(Notify::new());
    let signal = shutdown.clone();
    let serving = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { signal.notified().await })
            .await
    });

    info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "atelier-server started"
    );
    wait_for_shutdown().await;
    info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = server.graceful_shutdown_secs,
        "atelier-server stopping"
    );
    shutdown.notify_one();

    match tokio::time::timeout(Duration::from_secs(server.graceful_shutdown_secs), serving).await {
        Ok(joined) => joined??,
        Err(_) => warn!(
            event_name = "system.server.shutdown_timeout",
            correlation_id = "shutdown",
            "in-flight requests did not finish within the grace period"
        ),
    }
    app.db_pool.close().await;

    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            error = %error,
            "could not listen for ctrl-c; shutting down"
        );
    }
}
