//! CalMirror command-line application
//!
//! Wires the infrastructure adapters into the sync engine and exposes
//! `sync`, `status` and `link` commands.

pub mod commands;
pub mod context;

pub use context::AppContext;
