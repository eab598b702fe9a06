//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for CalMirror
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CalMirrorError {
    /// No linked calendar account exists for the user.
    #[error("Account not found for user: {0}")]
    AccountNotFound(String),

    /// The stored account has no refresh token; the user must re-link.
    #[error("Refresh token missing for user: {0}")]
    RefreshTokenMissing(String),

    /// The stored refresh token cannot be decrypted with the current key.
    #[error("Invalid credential encryption: {0}")]
    InvalidCredentialEncryption(String),

    /// The provider's token endpoint rejected the refresh grant.
    #[error("Token refresh failed ({status}): {body}")]
    TokenRefresh { status: u16, body: String },

    #[error("Decryption error: {0}")]
    Decryption(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    /// A list or delta page request returned a non-success status.
    #[error("Remote feed error ({status}): {body}")]
    RemoteFeed { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Another sync run already holds the lease for this user.
    #[error("Sync already in progress for user: {0}")]
    SyncInProgress(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Run-level failure classification surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The user must (re-)link their calendar account.
    AccountNotLinked,
    /// The token service failed; retrying later may succeed.
    TokenExchangeFailed,
    /// The provider's calendar API failed while paginating.
    Provider,
    /// The local store failed outside per-item reconciliation.
    Storage,
    /// Another run for the same user is in flight.
    Busy,
    Internal,
}

crate::impl_domain_status_conversions!(FailureKind {
    AccountNotLinked => "account_not_linked",
    TokenExchangeFailed => "token_exchange_failed",
    Provider => "provider",
    Storage => "storage",
    Busy => "busy",
    Internal => "internal",
});

impl CalMirrorError {
    /// Classify this error for the caller of a sync run.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::AccountNotFound(_)
            | Self::RefreshTokenMissing(_)
            | Self::InvalidCredentialEncryption(_) => FailureKind::AccountNotLinked,
            Self::TokenRefresh { .. } => FailureKind::TokenExchangeFailed,
            Self::RemoteFeed { .. } | Self::Network(_) => FailureKind::Provider,
            Self::Database(_) | Self::NotFound(_) => FailureKind::Storage,
            Self::SyncInProgress(_) => FailureKind::Busy,
            Self::Decryption(_)
            | Self::Encryption(_)
            | Self::Config(_)
            | Self::InvalidInput(_)
            | Self::Internal(_) => FailureKind::Internal,
        }
    }

    /// HTTP status carried by provider-originated errors.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            Self::TokenRefresh { status, .. } | Self::RemoteFeed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for CalMirror operations
pub type Result<T> = std::result::Result<T, CalMirrorError>;
