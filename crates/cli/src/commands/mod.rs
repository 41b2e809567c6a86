pub mod config;
pub mod doctor;
pub mod migrate;
pub mod suggest;

use serde::Serialize;

/// Why a command failed. Each class maps to one process exit code so
/// scripts can branch on it without parsing the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ConfigValidation,
    InvalidAttribute,
    RuntimeInit,
    Serialization,
    DbConnectivity,
    Migration,
}

impl FailureKind {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::ConfigValidation | Self::InvalidAttribute => 2,
            Self::RuntimeInit | Self::Serialization => 3,
            Self::DbConnectivity => 4,
            Self::Migration => 5,
        }
    }
}

/// What `main` prints and the code it exits with.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct StatusLine<'a> {
    command: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_class: Option<FailureKind>,
    message: String,
}

impl CommandResult {
    /// Human-readable output printed verbatim.
    pub fn text(output: String, exit_code: u8) -> Self {
        Self { exit_code, output }
    }

    /// A structured payload (report, suggestion record) as pretty JSON.
    pub fn json<T: Serialize>(command: &str, payload: &T, exit_code: u8) -> Self {
        match serde_json::to_string_pretty(payload) {
            Ok(output) => Self { exit_code, output },
            Err(error) => Self::failure(command, FailureKind::Serialization, error.to_string()),
        }
    }

    /// One-line `{"command", "status": "ok", "message"}` status.
    pub fn ok(command: &str, message: impl Into<String>) -> Self {
        Self::status_line(command, None, message.into(), 0)
    }

    pub fn failure(command: &str, kind: FailureKind, message: impl Into<String>) -> Self {
        Self::status_line(command, Some(kind), message.into(), kind.exit_code())
    }

    fn status_line(
        command: &str,
        error_class: Option<FailureKind>,
        message: String,
        exit_code: u8,
    ) -> Self {
        let status = if error_class.is_some() { "error" } else { "ok" };
        let line = StatusLine { command, status, error_class, message };
        let output = serde_json::to_string(&line)
            .unwrap_or_else(|_| format!("{}: {} ({})", line.command, line.message, line.status));
        Self { exit_code, output }
    }
}
