//! # CalMirror Domain
//!
//! Business domain types and models for CalMirror.
//!
//! This crate contains:
//! - Credential, cursor and meeting records mirrored from the provider
//! - Provider wire shapes consumed by the normalizer
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other CalMirror crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
