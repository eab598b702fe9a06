//! Domain types and models

pub mod account;
pub mod event;
pub mod meeting;
pub mod provider;
pub mod sync;

pub use account::{Account, CredentialUpdate};
pub use event::{LiveEvent, NormalizedEvent};
pub use meeting::{MeetingFields, MeetingRecord};
pub use provider::{
    EventPage, GraphDateTime, GraphEmailAddress, GraphEvent, GraphLocation, GraphOnlineMeeting,
    GraphRecipient, TokenGrant,
};
pub use sync::{ItemError, ReconcileReport, SyncState, SyncStatistics, SyncSummary, SyncType, SyncWindow};
