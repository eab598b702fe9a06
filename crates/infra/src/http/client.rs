use std::time::Duration;

use calmirror_domain::{CalMirrorError, SyncConfig};
use reqwest::Client as ReqwestClient;

use crate::errors::InfraError;

const USER_AGENT: &str = concat!("calmirror/", env!("CARGO_PKG_VERSION"));

/// Build the shared reqwest client.
///
/// Every request is bounded by `request_timeout_secs`. Requests are issued
/// once; retry policy belongs to whoever invokes the sync run.
pub fn build_http_client(sync: &SyncConfig) -> Result<ReqwestClient, CalMirrorError> {
    ReqwestClient::builder()
        .timeout(Duration::from_secs(sync.request_timeout_secs.max(1)))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|err| CalMirrorError::from(InfraError::from(err)))
}
