//! Shared test helpers for `calmirror-core` integration tests.
//!
//! These helpers wire a full [`SyncOrchestrator`] over in-memory mocks so
//! scenario tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod calendar;
pub mod repositories;

use std::sync::Arc;

use calmirror_common::crypto::CredentialVault;
use calmirror_core::{
    ChangeFeedClient, CredentialRefresher, ManualClock, ReconciliationEngine, SyncLeases,
    SyncOrchestrator, SyncSettings, TokenCipher,
};
use calmirror_domain::constants::DEFAULT_REFRESH_MARGIN_SECS;
use calmirror_domain::{Account, EventPage, Result as DomainResult};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub use self::calendar::*;
pub use self::repositories::*;

pub const USER: &str = "user-1";

/// Fixed "now" for every scenario: 2025-03-10 15:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap()
}

pub fn vault() -> Arc<CredentialVault> {
    Arc::new(CredentialVault::from_secret("integration-test-secret").unwrap())
}

/// An account whose cached access token is valid for another hour.
pub fn linked_account(vault: &CredentialVault, user_id: &str) -> Account {
    Account {
        user_id: user_id.to_string(),
        access_token_enc: Some(vault.encrypt("cached-access").unwrap()),
        refresh_token_enc: vault.encrypt("refresh-1").unwrap(),
        expires_at: Some(now() + Duration::hours(1)),
        token_type: Some("Bearer".into()),
    }
}

pub struct Harness {
    pub accounts: MockAccountRepository,
    pub states: MockSyncStateRepository,
    pub meetings: MockMeetingRepository,
    pub feed: ScriptedCalendarFeed,
    pub endpoint: MockTokenEndpoint,
    pub clock: ManualClock,
    pub vault: Arc<CredentialVault>,
    pub leases: SyncLeases,
    pub settings: SyncSettings,
}

impl Harness {
    /// Linked user, no stored cursor, endpoint that would grant a new token.
    pub fn new(pages: Vec<DomainResult<EventPage>>) -> Self {
        let vault = vault();
        Self {
            accounts: MockAccountRepository::default().with_account(linked_account(&vault, USER)),
            states: MockSyncStateRepository::default(),
            meetings: MockMeetingRepository::default(),
            feed: ScriptedCalendarFeed::new(pages),
            endpoint: MockTokenEndpoint::granting("fresh-access", Some("refresh-2"), 3600),
            clock: ManualClock::new(now()),
            vault,
            leases: SyncLeases::new(),
            settings: SyncSettings::default(),
        }
    }

    pub fn refresher(&self) -> CredentialRefresher {
        let cipher: Arc<dyn TokenCipher> = self.vault.clone();
        CredentialRefresher::new(
            Arc::new(self.accounts.clone()),
            Arc::new(self.endpoint.clone()),
            cipher,
            Arc::new(self.clock.clone()),
            DEFAULT_REFRESH_MARGIN_SECS,
        )
    }

    pub fn orchestrator(&self) -> SyncOrchestrator {
        let clock = Arc::new(self.clock.clone());
        SyncOrchestrator::new(
            Arc::new(self.refresher()),
            ChangeFeedClient::new(Arc::new(self.feed.clone())),
            ReconciliationEngine::new(Arc::new(self.meetings.clone()), clock.clone()),
            Arc::new(self.states.clone()),
            clock,
            self.leases.clone(),
            self.settings,
        )
    }
}
