//! # CalMirror Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repositories for accounts, cursor state and meetings
//! - Microsoft Graph adapters for the change feed and token endpoint
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Implements traits defined in `calmirror-core`
//! - Contains all "impure" code (I/O, HTTP, environment)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use database::{
    DbManager, SqliteAccountRepository, SqliteMeetingRepository, SqliteSyncStateRepository,
};
pub use errors::InfraError;
pub use http::build_http_client;
pub use integrations::calendar::{GraphCalendarFeed, GraphTokenEndpoint};
