//! Credential vault for OAuth material at rest.
//!
//! [`CredentialVault`] encrypts token strings with AES-256-GCM under a key
//! derived by SHA-256 from a configured secret. Each call draws a fresh
//! 96-bit nonce, so two encryptions of the same plaintext never match.
//!
//! ## Wire format
//!
//! ```text
//! hex(nonce) ":" hex(tag) ":" hex(ciphertext)
//! ```
//!
//! The 16-byte authentication tag is stored separately from the ciphertext so
//! that the format stays readable by the other services sharing the store.
//!
//! ## Usage
//!
//! ```rust
//! use calmirror_common::crypto::CredentialVault;
//!
//! let vault = CredentialVault::from_secret("correct horse battery staple")?;
//! let sealed = vault.encrypt("refresh-token")?;
//! assert_eq!(vault.decrypt(&sealed)?, "refresh-token");
//! # Ok::<(), calmirror_common::crypto::VaultError>(())
//! ```

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Separator between the nonce, tag and ciphertext segments.
pub const SEGMENT_DELIMITER: char = ':';

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const DEVELOPMENT_SECRET: &str = "calmirror-development-only-secret";

/// Errors raised by [`CredentialVault`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VaultError {
    #[error("cannot encrypt empty plaintext")]
    EmptyPlaintext,

    #[error("cannot decrypt empty ciphertext")]
    EmptyCiphertext,

    #[error("malformed ciphertext: {0}")]
    Malformed(String),

    /// Tag verification failed: tampered payload or wrong key.
    #[error("authentication tag mismatch")]
    Authentication,

    #[error("no vault secret configured for a production deployment")]
    MissingSecret,

    #[error("cipher failure: {0}")]
    Cipher(String),
}

impl VaultError {
    /// Whether this error arose while opening a ciphertext.
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::EmptyCiphertext | Self::Malformed(_) | Self::Authentication)
    }
}

/// Result alias for vault operations.
pub type VaultResult<T> = std::result::Result<T, VaultError>;

/// AES-256-GCM vault keyed by a hashed secret.
///
/// Stateless after construction; safe to share across tasks.
#[derive(Clone)]
pub struct CredentialVault {
    cipher: Aes256Gcm,
    fingerprint: String,
}

impl std::fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVault")
            .field("key", &"[REDACTED]")
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

impl CredentialVault {
    /// Derive the vault key from a configured secret.
    pub fn from_secret(secret: &str) -> VaultResult<Self> {
        if secret.is_empty() {
            return Err(VaultError::MissingSecret);
        }

        let key = Sha256::digest(secret.as_bytes());
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| VaultError::Cipher(format!("failed to create cipher: {e}")))?;
        let fingerprint = hex::encode(&Sha256::digest(key)[..4]);

        Ok(Self { cipher, fingerprint })
    }

    /// Build a vault from optional configuration.
    ///
    /// Without a secret, production deployments fail; any other deployment
    /// falls back to a fixed development key.
    pub fn from_optional_secret(secret: Option<&str>, production: bool) -> VaultResult<Self> {
        match secret.filter(|s| !s.is_empty()) {
            Some(secret) => Self::from_secret(secret),
            None if production => Err(VaultError::MissingSecret),
            None => {
                tracing::warn!("vault secret not configured; using development-only key");
                Self::from_secret(DEVELOPMENT_SECRET)
            }
        }
    }

    /// Short non-reversible identifier of the active key.
    pub fn key_fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Encrypt `plaintext` into the three-segment hex format.
    pub fn encrypt(&self, plaintext: &str) -> VaultResult<String> {
        if plaintext.is_empty() {
            return Err(VaultError::EmptyPlaintext);
        }

        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let mut sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|e| VaultError::Cipher(format!("encryption failed: {e}")))?;

        // aes-gcm appends the tag to the ciphertext
        let tag = sealed.split_off(sealed.len() - TAG_LEN);

        Ok(format!(
            "{}{SEGMENT_DELIMITER}{}{SEGMENT_DELIMITER}{}",
            hex::encode(nonce),
            hex::encode(tag),
            hex::encode(sealed)
        ))
    }

    /// Decrypt a value produced by [`CredentialVault::encrypt`].
    pub fn decrypt(&self, ciphertext: &str) -> VaultResult<String> {
        if ciphertext.is_empty() {
            return Err(VaultError::EmptyCiphertext);
        }

        let segments: Vec<&str> = ciphertext.split(SEGMENT_DELIMITER).collect();
        let [nonce_hex, tag_hex, body_hex] = segments.as_slice() else {
            return Err(VaultError::Malformed(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };

        let nonce = decode_segment(nonce_hex, "nonce")?;
        let tag = decode_segment(tag_hex, "tag")?;
        let mut sealed = decode_segment(body_hex, "ciphertext")?;

        if nonce.len() != NONCE_LEN {
            return Err(VaultError::Malformed(format!("nonce must be {NONCE_LEN} bytes")));
        }
        if tag.len() != TAG_LEN {
            return Err(VaultError::Malformed(format!("tag must be {TAG_LEN} bytes")));
        }

        sealed.extend_from_slice(&tag);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce), sealed.as_ref())
            .map_err(|_| VaultError::Authentication)?;

        String::from_utf8(plaintext)
            .map_err(|e| VaultError::Malformed(format!("plaintext is not UTF-8: {e}")))
    }
}

fn decode_segment(segment: &str, name: &str) -> VaultResult<Vec<u8>> {
    hex::decode(segment).map_err(|e| VaultError::Malformed(format!("invalid {name} hex: {e}")))
}
