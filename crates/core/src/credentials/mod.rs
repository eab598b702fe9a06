//! OAuth credential lifecycle.

pub mod cipher;
pub mod ports;
pub mod refresher;
