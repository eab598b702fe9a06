//! SQLite-backed implementation of the SyncStateRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use calmirror_core::SyncStateRepository;
use calmirror_domain::{Result, SyncState, SyncWindow};
use rusqlite::{params, OptionalExtension};
use tokio::task;
use tracing::{debug, instrument};

use super::manager::{get_connection, map_join_error, map_sql_error, SqlitePool};

pub struct SqliteSyncStateRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteSyncStateRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncStateRepository for SqliteSyncStateRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: &str) -> Result<Option<SyncState>> {
        let pool = Arc::clone(&self.pool);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<Option<SyncState>> {
            let conn = get_connection(&pool)?;
            conn.query_row(
                "SELECT user_id, cursor, window_start, window_end, last_synced_at
                 FROM sync_state WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(SyncState {
                        user_id: row.get(0)?,
                        cursor: row.get(1)?,
                        window: SyncWindow::new(row.get(2)?, row.get(3)?),
                        last_synced_at: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip_all, fields(user_id = %state.user_id))]
    async fn save(&self, state: &SyncState) -> Result<()> {
        let pool = Arc::clone(&self.pool);
        let state = state.clone();

        task::spawn_blocking(move || -> Result<()> {
            let conn = get_connection(&pool)?;
            conn.execute(
                "INSERT INTO sync_state (user_id, cursor, window_start, window_end, last_synced_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET
                    cursor = excluded.cursor,
                    window_start = excluded.window_start,
                    window_end = excluded.window_end,
                    last_synced_at = excluded.last_synced_at",
                params![
                    state.user_id,
                    state.cursor,
                    state.window.start,
                    state.window.end,
                    state.last_synced_at,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)??;

        debug!("sync state saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_cursor(&self, user_id: &str) -> Result<()> {
        let pool = Arc::clone(&self.pool);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = get_connection(&pool)?;
            conn.execute("UPDATE sync_state SET cursor = NULL WHERE user_id = ?1", params![user_id])
                .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}
