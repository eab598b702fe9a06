//! Maps SQLite, pool and HTTP failures onto `CalMirrorError`.

use calmirror_domain::CalMirrorError;
use rusqlite::ffi::ErrorCode;

/// Infrastructure-side wrapper so foreign `From` impls stay in this crate.
#[derive(Debug)]
pub struct InfraError(pub CalMirrorError);

impl From<InfraError> for CalMirrorError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

// SQLITE_CONSTRAINT_UNIQUE; raised by UNIQUE(owner_id, external_id).
const UNIQUE_VIOLATION: i32 = 2067;

impl From<rusqlite::Error> for InfraError {
    fn from(value: rusqlite::Error) -> Self {
        let mapped = match value {
            rusqlite::Error::SqliteFailure(err, message) => {
                let message = message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                        CalMirrorError::Database(format!("database is busy: {message}"))
                    }
                    ErrorCode::ConstraintViolation if err.extended_code == UNIQUE_VIOLATION => {
                        CalMirrorError::Database(format!("unique constraint violation: {message}"))
                    }
                    code => CalMirrorError::Database(format!("sqlite failure {code:?}: {message}")),
                }
            }
            other => CalMirrorError::Database(other.to_string()),
        };
        InfraError(mapped)
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(CalMirrorError::Database(format!("pool error: {value}")))
    }
}

impl From<reqwest::Error> for InfraError {
    fn from(value: reqwest::Error) -> Self {
        let mapped = if value.is_timeout() {
            CalMirrorError::Network("HTTP request timed out".into())
        } else if value.is_connect() {
            CalMirrorError::Network("HTTP connection failure".into())
        } else if value.is_decode() {
            CalMirrorError::InvalidInput(format!("failed to decode response: {value}"))
        } else {
            CalMirrorError::Network(value.to_string())
        };
        InfraError(mapped)
    }
}
