//! Calendar reconciliation: normalize provider events, page through the
//! change feed, and apply the result to the local mirror.

pub mod change_feed;
pub mod lease;
pub mod normalizer;
pub mod orchestrator;
pub mod ports;
pub mod reconcile;
