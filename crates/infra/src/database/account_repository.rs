//! SQLite-backed implementation of the AccountRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use calmirror_core::AccountRepository;
use calmirror_domain::{Account, CalMirrorError, CredentialUpdate, Result};
use rusqlite::{params, OptionalExtension};
use tokio::task;
use tracing::instrument;

use super::manager::{get_connection, map_join_error, map_sql_error, SqlitePool};

pub struct SqliteAccountRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteAccountRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Insert or replace the linked account for `account.user_id`.
    #[instrument(skip_all, fields(user_id = %account.user_id))]
    pub fn save(&self, account: &Account) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "INSERT INTO accounts (user_id, access_token_enc, refresh_token_enc, expires_at, token_type)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                access_token_enc = excluded.access_token_enc,
                refresh_token_enc = excluded.refresh_token_enc,
                expires_at = excluded.expires_at,
                token_type = excluded.token_type",
            params![
                account.user_id,
                account.access_token_enc,
                account.refresh_token_enc,
                account.expires_at,
                account.token_type,
            ],
        )
        .map_err(map_sql_error)?;
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Account>> {
        let pool = Arc::clone(&self.pool);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<Option<Account>> {
            let conn = get_connection(&pool)?;
            conn.query_row(
                "SELECT user_id, access_token_enc, refresh_token_enc, expires_at, token_type
                 FROM accounts WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(Account {
                        user_id: row.get(0)?,
                        access_token_enc: row.get(1)?,
                        refresh_token_enc: row.get(2)?,
                        expires_at: row.get(3)?,
                        token_type: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, update))]
    async fn update_credentials(&self, user_id: &str, update: CredentialUpdate) -> Result<()> {
        let pool = Arc::clone(&self.pool);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = get_connection(&pool)?;
            let changed = conn
                .execute(
                    "UPDATE accounts
                     SET access_token_enc = ?2, refresh_token_enc = ?3, expires_at = ?4, token_type = ?5
                     WHERE user_id = ?1",
                    params![
                        user_id,
                        update.access_token_enc,
                        update.refresh_token_enc,
                        update.expires_at,
                        update.token_type,
                    ],
                )
                .map_err(map_sql_error)?;

            if changed == 0 {
                return Err(CalMirrorError::AccountNotFound(user_id));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}
