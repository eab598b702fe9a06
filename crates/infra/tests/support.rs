use std::sync::Arc;

use calmirror_common::crypto::CredentialVault;
use calmirror_domain::{Account, ProviderConfig};
use calmirror_infra::database::DbManager;
use calmirror_infra::SqliteAccountRepository;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

pub const USER: &str = "user-1";

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a migrated database in a fresh temp directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("calmirror.db");

        let manager = DbManager::new(&db_path, 2).expect("db manager should be created");
        manager.run_migrations().expect("migrations should run");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    pub fn accounts(&self) -> SqliteAccountRepository {
        SqliteAccountRepository::new(self.manager.pool().clone())
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap()
}

pub fn vault() -> Arc<CredentialVault> {
    Arc::new(CredentialVault::from_secret("infra-test-secret").unwrap())
}

pub fn linked_account(vault: &CredentialVault, expires_in: Duration) -> Account {
    Account {
        user_id: USER.to_string(),
        access_token_enc: Some(vault.encrypt("cached-access").unwrap()),
        refresh_token_enc: vault.encrypt("refresh-1").unwrap(),
        expires_at: Some(now() + expires_in),
        token_type: Some("Bearer".into()),
    }
}

/// Provider config pointing both endpoints at a mock server.
pub fn provider_config(server_uri: &str) -> ProviderConfig {
    ProviderConfig {
        api_base: format!("{server_uri}/v1.0"),
        token_endpoint: format!("{server_uri}/oauth2/v2.0/token"),
        client_id: "client-123".into(),
        client_secret: Some("shh".into()),
        page_size: 2,
        ..ProviderConfig::default()
    }
}
