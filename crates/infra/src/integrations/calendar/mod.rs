//! Calendar provider integration
//!
//! Microsoft Graph adapters for the change feed and the OAuth token endpoint.

pub mod providers;

pub use providers::{GraphCalendarFeed, GraphTokenEndpoint};
