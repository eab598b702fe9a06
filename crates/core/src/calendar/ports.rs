//! Calendar port interfaces

use async_trait::async_trait;
use calmirror_domain::{EventPage, MeetingRecord, Result, SyncState, SyncWindow};

/// One page request against the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRequest {
    /// First page of a full-window scan.
    Window(SyncWindow),
    /// A provider-issued URL replayed verbatim (next page or delta cursor).
    Link(String),
}

/// Provider transport: one authenticated GET per call.
#[async_trait]
pub trait CalendarFeed: Send + Sync {
    /// Fetch a single page.
    ///
    /// Non-success statuses surface as `CalMirrorError::RemoteFeed`.
    async fn fetch_page(&self, access_token: &str, request: &FeedRequest) -> Result<EventPage>;
}

/// Persistence for per-user cursor state.
#[async_trait]
pub trait SyncStateRepository: Send + Sync {
    async fn find(&self, user_id: &str) -> Result<Option<SyncState>>;

    /// Insert or replace the state for `state.user_id`.
    async fn save(&self, state: &SyncState) -> Result<()>;

    /// Drop the cursor, keeping window bounds and last sync time.
    async fn clear_cursor(&self, user_id: &str) -> Result<()>;
}

/// Persistence for mirrored meetings, keyed by `(owner_id, external_id)`.
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    async fn find_by_external_id(
        &self,
        owner_id: &str,
        external_id: &str,
    ) -> Result<Option<MeetingRecord>>;

    async fn create(&self, record: &MeetingRecord) -> Result<()>;

    async fn update(&self, record: &MeetingRecord) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;

    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<MeetingRecord>>;
}
