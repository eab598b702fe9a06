//! [`TokenCipher`] backed by the shared credential vault.

use calmirror_common::crypto::{CredentialVault, VaultError};
use calmirror_domain::{CalMirrorError, Result};

use super::ports::TokenCipher;

impl TokenCipher for CredentialVault {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        CredentialVault::encrypt(self, plaintext).map_err(map_vault_error)
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String> {
        CredentialVault::decrypt(self, ciphertext).map_err(map_vault_error)
    }
}

pub(crate) fn map_vault_error(err: VaultError) -> CalMirrorError {
    if err.is_decryption() {
        CalMirrorError::Decryption(err.to_string())
    } else if matches!(err, VaultError::MissingSecret) {
        CalMirrorError::Config(err.to_string())
    } else {
        CalMirrorError::Encryption(err.to_string())
    }
}
