//! Sync cursor state and run results.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Which feed mode a run used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncType {
    /// No cursor was held; the whole window was scanned.
    Initial,
    /// The stored cursor was replayed against the delta feed.
    Incremental,
}

crate::impl_domain_status_conversions!(SyncType {
    Initial => "initial",
    Incremental => "incremental",
});

/// Date range mirrored locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SyncWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Rolling window anchored on UTC midnight of `now`'s date.
    pub fn around(now: DateTime<Utc>, lookback_days: u32, lookahead_days: u32) -> Self {
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        Self {
            start: midnight - Duration::days(i64::from(lookback_days)),
            end: midnight + Duration::days(i64::from(lookahead_days)),
        }
    }
}

/// Per-user change-feed position.
///
/// A present cursor means at least one run completed; an absent cursor forces
/// the next run to scan the full window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    pub user_id: String,
    #[serde(skip_serializing)]
    pub cursor: Option<String>,
    pub window: SyncWindow,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl SyncState {
    pub fn has_cursor(&self) -> bool {
        self.cursor.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

/// A single item that failed to reconcile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemError {
    pub external_id: String,
    pub message: String,
}

/// Outcome of applying one batch to the local store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub created: usize,
    pub updated: usize,
    /// Hard deletions and cancellations.
    pub deleted: usize,
    /// Incomplete or stale live events.
    pub skipped: usize,
    pub errors: Vec<ItemError>,
}

/// Aggregate counters reported to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatistics {
    pub total_fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl SyncStatistics {
    pub fn from_report(total_fetched: usize, report: &ReconcileReport) -> Self {
        Self {
            total_fetched,
            created: report.created,
            updated: report.updated,
            deleted: report.deleted,
            skipped: report.skipped,
            errors: report.errors.len(),
        }
    }
}

/// Caller-facing result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub sync_type: SyncType,
    pub range: SyncWindow,
    pub statistics: SyncStatistics,
    pub errors: Vec<ItemError>,
    pub has_cursor: bool,
    pub timestamp: DateTime<Utc>,
}
