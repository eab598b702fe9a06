//! Shared utilities for CalMirror crates.
//!
//! # Feature Tiers
//!
//! - `crypto` (default): [`CredentialVault`] for OAuth material at rest

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "crypto")]
pub mod crypto;

#[cfg(feature = "crypto")]
pub use crypto::{CredentialVault, VaultError, VaultResult};
