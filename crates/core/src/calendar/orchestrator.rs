//! Sync orchestrator
//!
//! Runs one end-to-end reconciliation for a user and reports what changed.

use std::sync::Arc;

use calmirror_domain::{
    Config, LogLevel, NormalizedEvent, Result, SyncState, SyncStatistics, SyncSummary, SyncType,
    SyncWindow,
};
use tracing::{debug, error, info, instrument, warn};

use super::change_feed::{ChangeFeedClient, FeedBatch};
use super::lease::SyncLeases;
use super::normalizer::normalize_event;
use super::ports::SyncStateRepository;
use super::reconcile::{ReconcileOptions, ReconciliationEngine};
use crate::clock::Clock;
use crate::credentials::refresher::CredentialRefresher;

const GONE: u16 = 410;

/// Run-level knobs taken from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    pub lookback_days: u32,
    pub lookahead_days: u32,
    pub staleness_guard: bool,
    pub log_level: LogLevel,
}

impl SyncSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            lookback_days: config.sync.lookback_days,
            lookahead_days: config.sync.lookahead_days,
            staleness_guard: config.sync.staleness_guard,
            log_level: config.log_level,
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Top-level sync coordinator
pub struct SyncOrchestrator {
    credentials: Arc<CredentialRefresher>,
    feed: ChangeFeedClient,
    engine: ReconciliationEngine,
    states: Arc<dyn SyncStateRepository>,
    clock: Arc<dyn Clock>,
    leases: SyncLeases,
    settings: SyncSettings,
}

impl SyncOrchestrator {
    pub fn new(
        credentials: Arc<CredentialRefresher>,
        feed: ChangeFeedClient,
        engine: ReconciliationEngine,
        states: Arc<dyn SyncStateRepository>,
        clock: Arc<dyn Clock>,
        leases: SyncLeases,
        settings: SyncSettings,
    ) -> Self {
        Self { credentials, feed, engine, states, clock, leases, settings }
    }

    /// Synchronize one user's mirror with the provider.
    ///
    /// 1. Claim the per-user lease
    /// 2. Resolve an access token (aborts before any fetch on failure)
    /// 3. Pick full-window or delta mode from the stored cursor
    /// 4. Fetch every page (all-or-nothing)
    /// 5. Normalize and reconcile each event
    /// 6. Persist the new cursor, even when some items failed
    #[instrument(skip(self))]
    pub async fn run(&self, user_id: &str) -> Result<SyncSummary> {
        let _lease = self.leases.try_acquire(user_id)?;

        let access_token = self.credentials.get_valid_access_token(user_id).await?;

        let stored = self.states.find(user_id).await?;
        let (sync_type, window, batch) = match stored.filter(SyncState::has_cursor) {
            Some(state) => {
                let cursor = state.cursor.unwrap_or_default();
                let batch = self.fetch_delta(user_id, &access_token, &cursor).await?;
                (SyncType::Incremental, state.window, batch)
            }
            None => {
                let window = SyncWindow::around(
                    self.clock.now(),
                    self.settings.lookback_days,
                    self.settings.lookahead_days,
                );
                let batch = self.feed.fetch_full_window(&access_token, window).await?;
                (SyncType::Initial, window, batch)
            }
        };
        debug!(user_id, %sync_type, pages = batch.pages, "feed fetched");

        let total_fetched = batch.events.len();
        let normalized: Vec<NormalizedEvent> = batch.events.iter().map(normalize_event).collect();

        let options = ReconcileOptions {
            staleness_guard: self.settings.staleness_guard && sync_type == SyncType::Initial,
        };
        let report = self.engine.reconcile(user_id, &normalized, options).await;

        let now = self.clock.now();
        let has_cursor = batch.cursor.is_some();
        if let Some(cursor) = batch.cursor {
            let state = SyncState {
                user_id: user_id.to_string(),
                cursor: Some(cursor),
                window,
                last_synced_at: Some(now),
            };
            self.states.save(&state).await?;
        } else {
            debug!(user_id, "provider issued no cursor; next run scans the full window");
        }

        let summary = SyncSummary {
            sync_type,
            range: window,
            statistics: SyncStatistics::from_report(total_fetched, &report),
            errors: report.errors,
            has_cursor,
            timestamp: now,
        };
        self.log_summary(user_id, &summary);

        Ok(summary)
    }

    /// Stored cursor state for `user_id`, without contacting the provider.
    pub async fn status(&self, user_id: &str) -> Result<Option<SyncState>> {
        self.states.find(user_id).await
    }

    async fn fetch_delta(&self, user_id: &str, access_token: &str, cursor: &str) -> Result<FeedBatch> {
        match self.feed.fetch_delta(access_token, cursor).await {
            Ok(batch) => Ok(batch),
            Err(err) => {
                error!(user_id, error = %err, "failed to fetch delta feed");

                if err.remote_status() == Some(GONE) {
                    warn!(user_id, "delta cursor expired (410 GONE), clearing for full rescan");
                    if let Err(clear_err) = self.states.clear_cursor(user_id).await {
                        warn!(user_id, error = %clear_err, "failed to clear expired cursor");
                    }
                }

                Err(err)
            }
        }
    }

    fn log_summary(&self, user_id: &str, summary: &SyncSummary) {
        let stats = &summary.statistics;
        match self.settings.log_level {
            LogLevel::Silent => {}
            LogLevel::Normal | LogLevel::Verbose => info!(
                user_id,
                sync_type = %summary.sync_type,
                fetched = stats.total_fetched,
                created = stats.created,
                updated = stats.updated,
                deleted = stats.deleted,
                skipped = stats.skipped,
                errors = stats.errors,
                "calendar sync completed"
            ),
        }

        if self.settings.log_level == LogLevel::Verbose {
            for item in &summary.errors {
                debug!(user_id, external_id = %item.external_id, message = %item.message, "item error");
            }
        }
    }
}
