//! Application context - dependency injection container

use std::sync::Arc;

use calmirror_common::crypto::CredentialVault;
use calmirror_core::{
    ChangeFeedClient, CredentialRefresher, ReconciliationEngine, SyncLeases, SyncOrchestrator,
    SyncSettings, SystemClock, TokenCipher,
};
use calmirror_domain::{CalMirrorError, Config, Deployment, Result};
use calmirror_infra::{
    build_http_client, DbManager, GraphCalendarFeed, GraphTokenEndpoint, SqliteAccountRepository,
    SqliteMeetingRepository, SqliteSyncStateRepository,
};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub vault: Arc<CredentialVault>,
    pub accounts: Arc<SqliteAccountRepository>,
    pub orchestrator: SyncOrchestrator,
}

impl AppContext {
    /// Wire every adapter from `config`.
    ///
    /// Opens (and migrates) the database, derives the vault key and builds the
    /// provider clients. Nothing contacts the provider until a sync runs.
    pub fn new(config: Config) -> Result<Self> {
        let vault = Arc::new(
            CredentialVault::from_optional_secret(
                config.vault.secret.as_deref(),
                config.environment == Deployment::Production,
            )
            .map_err(|e| CalMirrorError::Config(e.to_string()))?,
        );
        tracing::debug!(fingerprint = vault.key_fingerprint(), "credential vault ready");

        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;
        db.health_check()?;

        let http = build_http_client(&config.sync)?;
        let clock = Arc::new(SystemClock);
        let pool = db.pool().clone();

        let accounts = Arc::new(SqliteAccountRepository::new(pool.clone()));
        let cipher: Arc<dyn TokenCipher> = vault.clone();
        let refresher = CredentialRefresher::new(
            accounts.clone(),
            Arc::new(GraphTokenEndpoint::new(http.clone(), &config.provider)),
            cipher,
            clock.clone(),
            config.sync.refresh_margin_secs,
        );

        let orchestrator = SyncOrchestrator::new(
            Arc::new(refresher),
            ChangeFeedClient::new(Arc::new(GraphCalendarFeed::new(http, &config.provider))),
            ReconciliationEngine::new(Arc::new(SqliteMeetingRepository::new(pool.clone())), clock.clone()),
            Arc::new(SqliteSyncStateRepository::new(pool)),
            clock,
            SyncLeases::new(),
            SyncSettings::from_config(&config),
        );

        Ok(Self { config, db, vault, accounts, orchestrator })
    }
}
