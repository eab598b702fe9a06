//! CLI command handlers
//!
//! Each handler returns a serializable report; `main` prints it as JSON.

use calmirror_core::AccountRepository;
use calmirror_domain::{Account, CalMirrorError, FailureKind, Result, SyncState, SyncSummary};
use serde::Serialize;
use tracing::info;

use crate::context::AppContext;

/// Result of `calmirror status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub user_id: String,
    pub linked: bool,
    pub has_cursor: bool,
    pub state: Option<SyncState>,
}

/// Result of `calmirror link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkReport {
    pub user_id: String,
    pub linked: bool,
}

/// Failure payload printed when a sync run aborts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport {
    pub kind: FailureKind,
    pub status: Option<u16>,
    pub message: String,
}

impl From<&CalMirrorError> for FailureReport {
    fn from(err: &CalMirrorError) -> Self {
        Self { kind: err.failure_kind(), status: err.remote_status(), message: err.to_string() }
    }
}

pub async fn sync(ctx: &AppContext, user_id: &str) -> Result<SyncSummary> {
    ctx.orchestrator.run(user_id).await
}

pub async fn status(ctx: &AppContext, user_id: &str) -> Result<StatusReport> {
    let linked = ctx.accounts.find_by_user(user_id).await?.is_some();
    let state = ctx.orchestrator.status(user_id).await?;

    Ok(StatusReport {
        user_id: user_id.to_string(),
        linked,
        has_cursor: state.as_ref().is_some_and(SyncState::has_cursor),
        state,
    })
}

/// Store a refresh token obtained out of band.
///
/// The access token is left empty so the first sync performs a refresh.
pub fn link(ctx: &AppContext, user_id: &str, refresh_token: &str) -> Result<LinkReport> {
    let refresh_token = refresh_token.trim();
    if user_id.trim().is_empty() || refresh_token.is_empty() {
        return Err(CalMirrorError::InvalidInput("user id and refresh token are required".into()));
    }

    let refresh_token_enc =
        ctx.vault.encrypt(refresh_token).map_err(|e| CalMirrorError::Encryption(e.to_string()))?;
    ctx.accounts.save(&Account {
        user_id: user_id.to_string(),
        access_token_enc: None,
        refresh_token_enc,
        expires_at: None,
        token_type: None,
    })?;
    info!(user_id, "calendar account linked");

    Ok(LinkReport { user_id: user_id.to_string(), linked: true })
}
