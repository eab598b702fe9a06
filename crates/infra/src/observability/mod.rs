//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the configured [`LogLevel`] picks the
//! filter. Output goes to stderr so stdout stays free for command results.

use calmirror_domain::{CalMirrorError, LogLevel, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter for `level`, deferring to `RUST_LOG` when present.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.filter_directive()))
}

/// Install the global subscriber.
///
/// # Errors
/// Returns `CalMirrorError::Internal` if a global subscriber is already set.
pub fn init_logging(level: LogLevel, json: bool) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(level));

    let installed = if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init()
    } else {
        registry.with(fmt::layer().with_target(false).with_writer(std::io::stderr)).try_init()
    };

    installed.map_err(|e| CalMirrorError::Internal(format!("failed to install logger: {e}")))
}
