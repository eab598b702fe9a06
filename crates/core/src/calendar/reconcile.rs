//! Apply normalized events to the local meeting store.
//!
//! Items are applied one at a time in feed order. Each item is its own unit:
//! a failing lookup or write is recorded against its external id and the
//! batch carries on.

use std::sync::Arc;

use calmirror_domain::{
    ItemError, LiveEvent, MeetingFields, MeetingRecord, NormalizedEvent, ReconcileReport, Result,
};
use tracing::{debug, instrument, warn};

use super::ports::MeetingRepository;
use crate::clock::Clock;

/// Per-batch reconciliation switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Skip live updates whose remote copy is not newer than the stored one.
    pub staleness_guard: bool,
}

/// What happened to a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Created,
    Updated,
    Deleted,
    Skipped,
    Unchanged,
}

pub struct ReconciliationEngine {
    meetings: Arc<dyn MeetingRepository>,
    clock: Arc<dyn Clock>,
}

impl ReconciliationEngine {
    pub fn new(meetings: Arc<dyn MeetingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { meetings, clock }
    }

    /// Reconcile `events` for `owner_id`, isolating per-item failures.
    #[instrument(skip(self, events), fields(count = events.len()))]
    pub async fn reconcile(
        &self,
        owner_id: &str,
        events: &[NormalizedEvent],
        options: ReconcileOptions,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for event in events {
            match self.apply(owner_id, event, options).await {
                Ok(Outcome::Created) => report.created += 1,
                Ok(Outcome::Updated) => report.updated += 1,
                Ok(Outcome::Deleted) => report.deleted += 1,
                Ok(Outcome::Skipped) => report.skipped += 1,
                Ok(Outcome::Unchanged) => {}
                Err(err) => {
                    warn!(external_id = event.external_id(), error = %err, "failed to reconcile event");
                    report.errors.push(ItemError {
                        external_id: event.external_id().to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }

        debug!(
            created = report.created,
            updated = report.updated,
            deleted = report.deleted,
            skipped = report.skipped,
            errors = report.errors.len(),
            "reconciliation finished"
        );
        report
    }

    async fn apply(
        &self,
        owner_id: &str,
        event: &NormalizedEvent,
        options: ReconcileOptions,
    ) -> Result<Outcome> {
        match event {
            NormalizedEvent::Tombstone { external_id } => {
                match self.meetings.find_by_external_id(owner_id, external_id).await? {
                    Some(existing) => {
                        self.meetings.delete(&existing.id).await?;
                        Ok(Outcome::Deleted)
                    }
                    None => Ok(Outcome::Unchanged),
                }
            }
            NormalizedEvent::Cancelled { external_id } => {
                match self.meetings.find_by_external_id(owner_id, external_id).await? {
                    Some(mut existing) => {
                        existing.mark_cancelled(self.clock.now());
                        self.meetings.update(&existing).await?;
                        Ok(Outcome::Deleted)
                    }
                    None => Ok(Outcome::Unchanged),
                }
            }
            NormalizedEvent::Live(live) => self.upsert(owner_id, live, options).await,
        }
    }

    async fn upsert(
        &self,
        owner_id: &str,
        live: &LiveEvent,
        options: ReconcileOptions,
    ) -> Result<Outcome> {
        let Some((start, end)) = live.time_range() else {
            debug!(external_id = %live.external_id, "skipping event without start or end");
            return Ok(Outcome::Skipped);
        };

        let fields = MeetingFields {
            series_id: live.series_id.clone(),
            title: live.title.clone(),
            start,
            end,
            participants: live.participants.clone(),
            context: live.context.clone(),
            external_modified_at: live.external_modified_at,
        };
        let now = self.clock.now();

        match self.meetings.find_by_external_id(owner_id, &live.external_id).await? {
            Some(mut existing) => {
                if options.staleness_guard && is_stale(&existing, live) {
                    return Ok(Outcome::Skipped);
                }
                existing.apply_live(fields, now);
                self.meetings.update(&existing).await?;
                Ok(Outcome::Updated)
            }
            None => {
                let record = MeetingRecord::new(owner_id, live.external_id.as_str(), fields, now);
                self.meetings.create(&record).await?;
                Ok(Outcome::Created)
            }
        }
    }
}

/// Stored copy is at least as new as the remote one. Cancelled records are
/// never stale so that reactivation always applies.
fn is_stale(existing: &MeetingRecord, live: &LiveEvent) -> bool {
    if existing.is_cancelled {
        return false;
    }
    match (existing.fields.external_modified_at, live.external_modified_at) {
        (Some(stored), Some(remote)) => stored >= remote,
        _ => false,
    }
}
