//! Linked calendar account and its encrypted OAuth material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One linked provider account per user.
///
/// Token fields hold vault ciphertexts, never plaintext. The refresh token is
/// kept across access-token rotations; losing it requires re-authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: String,
    #[serde(skip_serializing)]
    pub access_token_enc: Option<String>,
    #[serde(skip_serializing)]
    pub refresh_token_enc: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub token_type: Option<String>,
}

impl Account {
    /// Whether the cached access token expires within `margin_secs` of `now`.
    ///
    /// An unknown expiry counts as expired.
    pub fn expires_within(&self, now: DateTime<Utc>, margin_secs: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now + chrono::Duration::seconds(margin_secs),
            None => true,
        }
    }
}

/// Fields written atomically after a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialUpdate {
    pub access_token_enc: String,
    pub refresh_token_enc: String,
    pub expires_at: DateTime<Utc>,
    pub token_type: String,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn account(expires_at: Option<DateTime<Utc>>) -> Account {
        Account {
            user_id: "u1".into(),
            access_token_enc: Some("enc".into()),
            refresh_token_enc: "enc-refresh".into(),
            expires_at,
            token_type: Some("Bearer".into()),
        }
    }

    #[test]
    fn expiry_inside_margin_is_expired() {
        let now = Utc::now();
        assert!(account(Some(now + Duration::seconds(60))).expires_within(now, 120));
        assert!(!account(Some(now + Duration::seconds(600))).expires_within(now, 120));
        assert!(account(None).expires_within(now, 120));
    }
}
