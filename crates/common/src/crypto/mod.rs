//! Shared cryptographic primitives.

pub mod encryption;

pub use encryption::{CredentialVault, VaultError, VaultResult, SEGMENT_DELIMITER};
