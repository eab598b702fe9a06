//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Credential lifecycle
pub const DEFAULT_REFRESH_MARGIN_SECS: i64 = 120;
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";
pub const REFRESH_GRANT_TYPE: &str = "refresh_token";

// Sync window
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 90;
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Normalization
pub const UNTITLED_EVENT: &str = "Untitled Event";
pub const PARTICIPANT_SEPARATOR: &str = ", ";
pub const CONTEXT_SEPARATOR: &str = " | ";

// Microsoft Graph
pub const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";
pub const GRAPH_TOKEN_ENDPOINT: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/token";
pub const GRAPH_DEFAULT_SCOPE: &str = "offline_access Calendars.Read";
