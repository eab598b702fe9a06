//! Provider events after normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of one observed change-feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizedEvent {
    /// The id was deleted upstream; hard-delete the local record.
    Tombstone { external_id: String },
    /// The event was cancelled; soft-mark the local record.
    Cancelled { external_id: String },
    /// The event exists and should be upserted.
    Live(LiveEvent),
}

impl NormalizedEvent {
    pub fn external_id(&self) -> &str {
        match self {
            Self::Tombstone { external_id } | Self::Cancelled { external_id } => external_id,
            Self::Live(live) => &live.external_id,
        }
    }
}

/// A live event; `start`/`end` may be missing, in which case it is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveEvent {
    pub external_id: String,
    pub series_id: Option<String>,
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub participants: String,
    pub context: Option<String>,
    pub external_modified_at: Option<DateTime<Utc>>,
}

impl LiveEvent {
    /// Both endpoints of the time range, if present.
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.start?, self.end?))
    }
}
