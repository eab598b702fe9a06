//! Configuration management
//!
//! Every behaviour knob the sync engine consults is carried here and injected
//! at construction time. Nothing below `calmirror-infra`'s loader reads the
//! process environment.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOOKAHEAD_DAYS, DEFAULT_LOOKBACK_DAYS, DEFAULT_PAGE_SIZE, DEFAULT_REFRESH_MARGIN_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, GRAPH_API_BASE, GRAPH_DEFAULT_SCOPE, GRAPH_TOKEN_ENDPOINT,
};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub environment: Deployment,
    pub database: DatabaseConfig,
    pub provider: ProviderConfig,
    pub sync: SyncConfig,
    pub vault: VaultConfig,
    pub log_level: LogLevel,
}

/// Deployment mode; production refuses to run without a vault secret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    #[default]
    Development,
    Production,
}

crate::impl_domain_status_conversions!(Deployment {
    Development => "development",
    Production => "production",
});

/// Logging verbosity injected into the orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Silent,
    #[default]
    Normal,
    Verbose,
}

crate::impl_domain_status_conversions!(LogLevel {
    Silent => "silent",
    Normal => "normal",
    Verbose => "verbose",
});

impl LogLevel {
    /// `EnvFilter` directive used when no `RUST_LOG` override is present.
    pub fn filter_directive(self) -> &'static str {
        match self {
            Self::Silent => "error",
            Self::Normal => "info",
            Self::Verbose => "debug",
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "calmirror.db".to_string(), pool_size: 4 }
    }
}

/// Calendar provider (Microsoft Graph) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_base: String,
    pub token_endpoint: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
    pub scope: String,
    pub page_size: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: GRAPH_API_BASE.to_string(),
            token_endpoint: GRAPH_TOKEN_ENDPOINT.to_string(),
            client_id: String::new(),
            client_secret: None,
            scope: GRAPH_DEFAULT_SCOPE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub lookback_days: u32,
    pub lookahead_days: u32,
    pub refresh_margin_secs: i64,
    pub request_timeout_secs: u64,
    /// Skip re-applying unchanged events during full-window runs.
    pub staleness_guard: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            refresh_margin_secs: DEFAULT_REFRESH_MARGIN_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            staleness_guard: true,
        }
    }
}

/// Credential vault configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    #[serde(skip_serializing)]
    pub secret: Option<String>,
}
