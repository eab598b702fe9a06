//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If `CALMIRROR_DB_PATH` is set, build the config from defaults plus
//!    environment variables
//! 2. Otherwise look for a config file (JSON or TOML by extension) and apply
//!    the same environment overrides on top of it
//!
//! ## Environment Variables
//! - `CALMIRROR_ENV`: `development` or `production`
//! - `CALMIRROR_DB_PATH`, `CALMIRROR_DB_POOL_SIZE`
//! - `CALMIRROR_GRAPH_API_BASE`, `CALMIRROR_TOKEN_ENDPOINT`
//! - `CALMIRROR_CLIENT_ID`, `CALMIRROR_CLIENT_SECRET`, `CALMIRROR_SCOPE`
//! - `CALMIRROR_PAGE_SIZE`
//! - `CALMIRROR_LOOKBACK_DAYS`, `CALMIRROR_LOOKAHEAD_DAYS`
//! - `CALMIRROR_REFRESH_MARGIN_SECS`, `CALMIRROR_REQUEST_TIMEOUT_SECS`
//! - `CALMIRROR_STALENESS_GUARD`: true/false
//! - `CALMIRROR_VAULT_SECRET`
//! - `CALMIRROR_LOG_LEVEL`: `silent`, `normal` or `verbose`
//!
//! ## File Locations
//! The loader searches `calmirror.{toml,json}` then `config.{toml,json}` in the
//! current directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use calmirror_domain::{CalMirrorError, Config, Result};

const DB_PATH_VAR: &str = "CALMIRROR_DB_PATH";
const FILE_NAMES: [&str; 4] = ["calmirror.toml", "calmirror.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `CalMirrorError::Config` if no source is available, a file is
/// malformed, or an environment value does not parse.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables over built-in defaults.
///
/// # Errors
/// Returns `CalMirrorError::Config` when `CALMIRROR_DB_PATH` is missing or a
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    if std::env::var(DB_PATH_VAR).is_err() {
        return Err(CalMirrorError::Config(format!(
            "Missing required environment variable: {DB_PATH_VAR}"
        )));
    }
    apply_env_overrides(Config::default(), |key| std::env::var(key).ok())
}

/// Load configuration from a file, then apply environment overrides.
///
/// If `path` is `None`, uses [`find_config_file`].
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CalMirrorError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            CalMirrorError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CalMirrorError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CalMirrorError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CalMirrorError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(CalMirrorError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Return the first configuration file found in the standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Overlay `CALMIRROR_*` values returned by `lookup` onto `config`.
fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("CALMIRROR_ENV") {
        config.environment = parse_var("CALMIRROR_ENV", &value)?;
    }
    if let Some(value) = lookup(DB_PATH_VAR) {
        config.database.path = value;
    }
    if let Some(value) = lookup("CALMIRROR_DB_POOL_SIZE") {
        config.database.pool_size = parse_var("CALMIRROR_DB_POOL_SIZE", &value)?;
    }
    if let Some(value) = lookup("CALMIRROR_GRAPH_API_BASE") {
        config.provider.api_base = value;
    }
    if let Some(value) = lookup("CALMIRROR_TOKEN_ENDPOINT") {
        config.provider.token_endpoint = value;
    }
    if let Some(value) = lookup("CALMIRROR_CLIENT_ID") {
        config.provider.client_id = value;
    }
    if let Some(value) = lookup("CALMIRROR_CLIENT_SECRET") {
        config.provider.client_secret = Some(value);
    }
    if let Some(value) = lookup("CALMIRROR_SCOPE") {
        config.provider.scope = value;
    }
    if let Some(value) = lookup("CALMIRROR_PAGE_SIZE") {
        config.provider.page_size = parse_var("CALMIRROR_PAGE_SIZE", &value)?;
    }
    if let Some(value) = lookup("CALMIRROR_LOOKBACK_DAYS") {
        config.sync.lookback_days = parse_var("CALMIRROR_LOOKBACK_DAYS", &value)?;
    }
    if let Some(value) = lookup("CALMIRROR_LOOKAHEAD_DAYS") {
        config.sync.lookahead_days = parse_var("CALMIRROR_LOOKAHEAD_DAYS", &value)?;
    }
    if let Some(value) = lookup("CALMIRROR_REFRESH_MARGIN_SECS") {
        config.sync.refresh_margin_secs = parse_var("CALMIRROR_REFRESH_MARGIN_SECS", &value)?;
    }
    if let Some(value) = lookup("CALMIRROR_REQUEST_TIMEOUT_SECS") {
        config.sync.request_timeout_secs = parse_var("CALMIRROR_REQUEST_TIMEOUT_SECS", &value)?;
    }
    if let Some(value) = lookup("CALMIRROR_STALENESS_GUARD") {
        config.sync.staleness_guard = parse_bool(&value);
    }
    if let Some(value) = lookup("CALMIRROR_VAULT_SECRET") {
        config.vault.secret = Some(value);
    }
    if let Some(value) = lookup("CALMIRROR_LOG_LEVEL") {
        config.log_level = parse_var("CALMIRROR_LOG_LEVEL", &value)?;
    }
    Ok(config)
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| CalMirrorError::Config(format!("Invalid value for {key}: {e}")))
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
