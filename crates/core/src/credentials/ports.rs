//! Credential port interfaces

use async_trait::async_trait;
use calmirror_domain::{Account, CredentialUpdate, Result, TokenGrant};

/// Persistence for linked provider accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Account>>;

    /// Persist rotated credentials as one atomic write.
    async fn update_credentials(&self, user_id: &str, update: CredentialUpdate) -> Result<()>;
}

/// The provider's OAuth token endpoint.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Exchange a refresh token using the `refresh_token` grant.
    ///
    /// Non-success responses surface as `CalMirrorError::TokenRefresh`.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant>;
}

/// Symmetric protection of token strings at rest.
pub trait TokenCipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String>;
    fn decrypt(&self, ciphertext: &str) -> Result<String>;
}
