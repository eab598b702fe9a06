//! Access-token resolution with margin-based refresh.
//!
//! Manages the stored OAuth material for one provider account:
//! - Reuses the cached access token while it is outside the safety margin
//! - Exchanges the refresh token when the cached token is unusable
//! - Persists the rotated, re-encrypted credentials before returning

use std::sync::Arc;

use calmirror_domain::constants::DEFAULT_TOKEN_TYPE;
use calmirror_domain::{Account, CalMirrorError, CredentialUpdate, Result};
use chrono::Duration;
use tracing::{debug, info, instrument, warn};

use super::ports::{AccountRepository, TokenCipher, TokenEndpoint};
use crate::clock::Clock;

/// Status reported when a 200 grant carries an unusable lifetime.
const SUCCESS_STATUS: u16 = 200;

/// Resolves a usable plaintext access token for a user.
pub struct CredentialRefresher {
    accounts: Arc<dyn AccountRepository>,
    endpoint: Arc<dyn TokenEndpoint>,
    cipher: Arc<dyn TokenCipher>,
    clock: Arc<dyn Clock>,
    refresh_margin_secs: i64,
}

impl CredentialRefresher {
    /// Create a refresher.
    ///
    /// # Arguments
    /// * `refresh_margin_secs` - Refresh when the cached token expires within
    ///   this many seconds (default: 120)
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        endpoint: Arc<dyn TokenEndpoint>,
        cipher: Arc<dyn TokenCipher>,
        clock: Arc<dyn Clock>,
        refresh_margin_secs: i64,
    ) -> Self {
        Self { accounts, endpoint, cipher, clock, refresh_margin_secs }
    }

    /// Return a plaintext access token, refreshing it first if needed.
    ///
    /// # Errors
    /// - `AccountNotFound` when the user has no linked account
    /// - `RefreshTokenMissing` when the stored refresh token is empty
    /// - `InvalidCredentialEncryption` when the refresh token cannot be
    ///   decrypted
    /// - `TokenRefresh` when the token endpoint rejects the grant
    #[instrument(skip(self))]
    pub async fn get_valid_access_token(&self, user_id: &str) -> Result<String> {
        let account = self
            .accounts
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| CalMirrorError::AccountNotFound(user_id.to_string()))?;

        if account.refresh_token_enc.trim().is_empty() {
            return Err(CalMirrorError::RefreshTokenMissing(user_id.to_string()));
        }

        if let Some(token) = self.cached_access_token(&account) {
            debug!(user_id, "reusing cached access token");
            return Ok(token);
        }

        self.refresh(&account).await
    }

    fn cached_access_token(&self, account: &Account) -> Option<String> {
        let now = self.clock.now();
        if account.expires_within(now, self.refresh_margin_secs) {
            return None;
        }

        let sealed = account.access_token_enc.as_deref().filter(|s| !s.is_empty())?;
        match self.cipher.decrypt(sealed) {
            Ok(token) => Some(token),
            Err(err) => {
                warn!(
                    user_id = %account.user_id,
                    error = %err,
                    "cached access token failed to decrypt; refreshing"
                );
                None
            }
        }
    }

    async fn refresh(&self, account: &Account) -> Result<String> {
        let user_id = account.user_id.as_str();

        let refresh_token = self
            .cipher
            .decrypt(&account.refresh_token_enc)
            .map_err(|err| CalMirrorError::InvalidCredentialEncryption(err.to_string()))?;

        info!(user_id, "refreshing provider access token");
        let grant = self.endpoint.refresh(&refresh_token).await?;

        // Providers may omit a rotated refresh token; keep the current one then.
        let next_refresh =
            grant.refresh_token.as_deref().filter(|t| !t.is_empty()).unwrap_or(&refresh_token);

        let expires_at = Duration::try_seconds(grant.expires_in)
            .and_then(|lifetime| self.clock.now().checked_add_signed(lifetime))
            .ok_or_else(|| CalMirrorError::TokenRefresh {
                status: SUCCESS_STATUS,
                body: format!("unrepresentable expires_in: {}", grant.expires_in),
            })?;

        let update = CredentialUpdate {
            access_token_enc: self.cipher.encrypt(&grant.access_token)?,
            refresh_token_enc: self.cipher.encrypt(next_refresh)?,
            expires_at,
            token_type: grant
                .token_type
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
        };

        self.accounts.update_credentials(user_id, update).await?;
        debug!(user_id, %expires_at, "persisted refreshed credentials");

        Ok(grant.access_token)
    }
}
