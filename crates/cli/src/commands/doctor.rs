use std::path::Path;

use atelier_core::config::{AppConfig, LoadOptions, MIN_SIGNING_SECRET_BYTES};
use atelier_db::{connect_with_settings, connection::ping};
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
pub struct DoctorCheck {
    pub name: &'static str,
    pub status: CheckStatus,
    pub details: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub overall_status: CheckStatus,
    pub summary: String,
    pub checks: Vec<DoctorCheck>,
}

const CHECKS_AFTER_CONFIG: [&str; 3] =
    ["identity_secret", "upload_directory", "database_connectivity"];

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    if json_output {
        CommandResult::json("doctor", &report, exit_code)
    } else {
        CommandResult::text(render_human(&report), exit_code)
    }
}

pub fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_identity_secret(&config));
            checks.push(check_upload_directory(&config.uploads.dir));
            checks.push(check_database_connectivity(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.extend(CHECKS_AFTER_CONFIG.into_iter().map(|name| DoctorCheck {
                name,
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            }));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_identity_secret(config: &AppConfig) -> DoctorCheck {
    let length = config.identity.signing_secret.expose_secret().len();
    let status =
        if length >= MIN_SIGNING_SECRET_BYTES { CheckStatus::Pass } else { CheckStatus::Fail };
    DoctorCheck {
        name: "identity_secret",
        status,
        details: format!(
            "signing secret is {length} bytes (minimum {MIN_SIGNING_SECRET_BYTES}); tokens expire after {}s",
            config.identity.max_token_age_secs
        ),
    }
}

fn check_upload_directory(dir: &Path) -> DoctorCheck {
    let (status, details) = if dir.is_dir() {
        match dir.metadata() {
            Ok(metadata) if metadata.permissions().readonly() => {
                (CheckStatus::Fail, format!("`{}` is read-only", dir.display()))
            }
            _ => (CheckStatus::Pass, format!("`{}` exists", dir.display())),
        }
    } else if dir.exists() {
        (CheckStatus::Fail, format!("`{}` exists but is not a directory", dir.display()))
    } else {
        (CheckStatus::Pass, format!("`{}` will be created on server start", dir.display()))
    };
    DoctorCheck { name: "upload_directory", status, details }
}

fn check_database_connectivity(config: &AppConfig) -> DoctorCheck {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

        let probe = ping(&pool).await.map_err(|error| format!("database query failed: {error}"));
        pool.close().await;
        probe
    });

    match result {
        Ok(()) => DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: format!("connected using `{}`", config.database.url),
        },
        Err(error) => {
            DoctorCheck { name: "database_connectivity", status: CheckStatus::Fail, details: error }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
