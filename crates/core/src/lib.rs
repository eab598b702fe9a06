//! # CalMirror Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the store, the provider and the
//!   token endpoint
//! - Credential lifecycle (`CredentialRefresher`)
//! - Calendar reconciliation (normalizer, change feed, engine, orchestrator)
//!
//! ## Architecture Principles
//! - Only depends on `calmirror-common` and `calmirror-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod calendar;
pub mod clock;
pub mod credentials;

// Re-export specific items to avoid ambiguity
pub use calendar::change_feed::{ChangeFeedClient, FeedBatch};
pub use calendar::lease::{SyncLease, SyncLeases};
pub use calendar::orchestrator::{SyncOrchestrator, SyncSettings};
pub use calendar::ports::{CalendarFeed, FeedRequest, MeetingRepository, SyncStateRepository};
pub use calendar::reconcile::{ReconcileOptions, ReconciliationEngine};
pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::ports::{AccountRepository, TokenCipher, TokenEndpoint};
pub use credentials::refresher::CredentialRefresher;
