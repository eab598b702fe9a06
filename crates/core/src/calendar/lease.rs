//! In-process mutual exclusion for sync runs.

use std::collections::HashSet;
use std::sync::Arc;

use calmirror_domain::{CalMirrorError, Result};
use parking_lot::Mutex;

/// Set of users with a run in flight.
#[derive(Debug, Clone, Default)]
pub struct SyncLeases {
    active: Arc<Mutex<HashSet<String>>>,
}

impl SyncLeases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the lease for `user_id`, failing with `SyncInProgress` if held.
    pub fn try_acquire(&self, user_id: &str) -> Result<SyncLease> {
        if !self.active.lock().insert(user_id.to_string()) {
            return Err(CalMirrorError::SyncInProgress(user_id.to_string()));
        }
        Ok(SyncLease { active: Arc::clone(&self.active), user_id: user_id.to_string() })
    }

    pub fn is_held(&self, user_id: &str) -> bool {
        self.active.lock().contains(user_id)
    }
}

/// Held for the duration of one run; released on drop.
#[derive(Debug)]
pub struct SyncLease {
    active: Arc<Mutex<HashSet<String>>>,
    user_id: String,
}

impl Drop for SyncLease {
    fn drop(&mut self) {
        self.active.lock().remove(&self.user_id);
    }
}
