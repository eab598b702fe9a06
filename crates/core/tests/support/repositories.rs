//! Mock repository implementations for testing
//!
//! In-memory stand-ins for the store ports so orchestrator tests run without
//! SQLite.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calmirror_core::{AccountRepository, MeetingRepository, SyncStateRepository};
use calmirror_domain::{
    Account, CalMirrorError, CredentialUpdate, MeetingRecord, Result as DomainResult, SyncState,
};

/// In-memory mock for `AccountRepository`.
#[derive(Default, Clone)]
pub struct MockAccountRepository {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    updates: Arc<Mutex<usize>>,
}

impl MockAccountRepository {
    pub fn with_account(self, account: Account) -> Self {
        self.accounts.lock().unwrap().insert(account.user_id.clone(), account);
        self
    }

    pub fn get(&self, user_id: &str) -> Option<Account> {
        self.accounts.lock().unwrap().get(user_id).cloned()
    }

    /// Number of `update_credentials` calls observed.
    pub fn update_count(&self) -> usize {
        *self.updates.lock().unwrap()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_user(&self, user_id: &str) -> DomainResult<Option<Account>> {
        Ok(self.get(user_id))
    }

    async fn update_credentials(&self, user_id: &str, update: CredentialUpdate) -> DomainResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(user_id)
            .ok_or_else(|| CalMirrorError::AccountNotFound(user_id.to_string()))?;

        account.access_token_enc = Some(update.access_token_enc);
        account.refresh_token_enc = update.refresh_token_enc;
        account.expires_at = Some(update.expires_at);
        account.token_type = Some(update.token_type);
        *self.updates.lock().unwrap() += 1;
        Ok(())
    }
}

/// In-memory mock for `SyncStateRepository`.
#[derive(Default, Clone)]
pub struct MockSyncStateRepository {
    states: Arc<Mutex<HashMap<String, SyncState>>>,
}

impl MockSyncStateRepository {
    pub fn with_state(self, state: SyncState) -> Self {
        self.states.lock().unwrap().insert(state.user_id.clone(), state);
        self
    }

    pub fn get(&self, user_id: &str) -> Option<SyncState> {
        self.states.lock().unwrap().get(user_id).cloned()
    }
}

#[async_trait]
impl SyncStateRepository for MockSyncStateRepository {
    async fn find(&self, user_id: &str) -> DomainResult<Option<SyncState>> {
        Ok(self.get(user_id))
    }

    async fn save(&self, state: &SyncState) -> DomainResult<()> {
        self.states.lock().unwrap().insert(state.user_id.clone(), state.clone());
        Ok(())
    }

    async fn clear_cursor(&self, user_id: &str) -> DomainResult<()> {
        if let Some(state) = self.states.lock().unwrap().get_mut(user_id) {
            state.cursor = None;
        }
        Ok(())
    }
}

/// In-memory mock for `MeetingRepository`.
///
/// Writes for an external id listed via [`MockMeetingRepository::fail_writes_for`]
/// return a database error.
#[derive(Default, Clone)]
pub struct MockMeetingRepository {
    rows: Arc<Mutex<Vec<MeetingRecord>>>,
    failing: Arc<Mutex<Vec<String>>>,
}

impl MockMeetingRepository {
    pub fn with_meeting(self, record: MeetingRecord) -> Self {
        self.rows.lock().unwrap().push(record);
        self
    }

    pub fn fail_writes_for(&self, external_id: &str) {
        self.failing.lock().unwrap().push(external_id.to_string());
    }

    pub fn all(&self) -> Vec<MeetingRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn find(&self, external_id: &str) -> Option<MeetingRecord> {
        self.rows.lock().unwrap().iter().find(|r| r.external_id == external_id).cloned()
    }

    fn check_write(&self, record: &MeetingRecord) -> DomainResult<()> {
        if self.failing.lock().unwrap().contains(&record.external_id) {
            return Err(CalMirrorError::Database(format!(
                "constraint failed for {}",
                record.external_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MeetingRepository for MockMeetingRepository {
    async fn find_by_external_id(
        &self,
        owner_id: &str,
        external_id: &str,
    ) -> DomainResult<Option<MeetingRecord>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.owner_id == owner_id && r.external_id == external_id)
            .cloned())
    }

    async fn create(&self, record: &MeetingRecord) -> DomainResult<()> {
        self.check_write(record)?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.owner_id == record.owner_id && r.external_id == record.external_id)
        {
            return Err(CalMirrorError::Database("UNIQUE constraint failed".into()));
        }
        rows.push(record.clone());
        Ok(())
    }

    async fn update(&self, record: &MeetingRecord) -> DomainResult<()> {
        self.check_write(record)?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| CalMirrorError::NotFound(format!("meeting {}", record.id)))?;
        *row = record.clone();
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.rows.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }

    async fn list_for_owner(&self, owner_id: &str) -> DomainResult<Vec<MeetingRecord>> {
        Ok(self.rows.lock().unwrap().iter().filter(|r| r.owner_id == owner_id).cloned().collect())
    }
}
