//! Calendar provider implementations

pub mod microsoft;

pub use microsoft::{GraphCalendarFeed, GraphTokenEndpoint};
