use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use atelier_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_PATHS};
use secrecy::ExposeSecret;
use toml::Value;

/// One reported setting: its dotted key, the env variables that can set it
/// (first match wins), and the effective value as printed.
struct Entry {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for entry in entries(&config) {
        let source = field_source(
            entry.key_path,
            entry.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(entry.key_path, &entry.value, source));
    }

    lines.join("\n")
}

fn entry(key_path: &'static str, env_keys: &'static [&'static str], value: String) -> Entry {
    Entry { key_path, env_keys, value }
}

fn entries(config: &AppConfig) -> Vec<Entry> {
    vec![
        entry("database.url", &["ATELIER_DATABASE_URL"], config.database.url.clone()),
        entry(
            "database.max_connections",
            &["ATELIER_DATABASE_MAX_CONNECTIONS"],
            config.database.max_connections.to_string(),
        ),
        entry(
            "database.timeout_secs",
            &["ATELIER_DATABASE_TIMEOUT_SECS"],
            config.database.timeout_secs.to_string(),
        ),
        entry(
            "server.bind_address",
            &["ATELIER_SERVER_BIND_ADDRESS"],
            config.server.bind_address.clone(),
        ),
        entry("server.port", &["ATELIER_SERVER_PORT"], config.server.port.to_string()),
        entry(
            "server.health_check_port",
            &["ATELIER_SERVER_HEALTH_CHECK_PORT"],
            config.server.health_check_port.to_string(),
        ),
        entry(
            "server.graceful_shutdown_secs",
            &["ATELIER_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            config.server.graceful_shutdown_secs.to_string(),
        ),
        entry(
            "server.allowed_origins",
            &["ATELIER_SERVER_ALLOWED_ORIGINS"],
            config.server.allowed_origins.join(","),
        ),
        entry("uploads.dir", &["ATELIER_UPLOADS_DIR"], config.uploads.dir.display().to_string()),
        entry(
            "uploads.max_upload_bytes",
            &["ATELIER_UPLOADS_MAX_UPLOAD_BYTES"],
            config.uploads.max_upload_bytes.to_string(),
        ),
        entry(
            "identity.signing_secret",
            &["ATELIER_IDENTITY_SIGNING_SECRET"],
            redact_secret(config.identity.signing_secret.expose_secret()),
        ),
        entry(
            "identity.max_token_age_secs",
            &["ATELIER_IDENTITY_MAX_TOKEN_AGE_SECS"],
            config.identity.max_token_age_secs.to_string(),
        ),
        entry(
            "logging.level",
            &["ATELIER_LOGGING_LEVEL", "ATELIER_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        entry(
            "logging.format",
            &["ATELIER_LOGGING_FORMAT", "ATELIER_LOG_FORMAT"],
            format!("{:?}", config.logging.format),
        ),
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from).find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Never prints secret material; only whether it is set and its length.
fn redact_secret(secret: &str) -> String {
    match secret.trim().len() {
        0 => "<empty>".to_string(),
        length => format!("<redacted: {length} bytes>"),
    }
}
