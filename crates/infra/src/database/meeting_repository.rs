//! SQLite-backed implementation of the MeetingRepository port.
//!
//! Each call is its own statement; no transaction spans multiple items.

use std::sync::Arc;

use async_trait::async_trait;
use calmirror_core::MeetingRepository;
use calmirror_domain::{CalMirrorError, MeetingFields, MeetingRecord, Result};
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;
use tracing::instrument;

use super::manager::{get_connection, map_join_error, map_sql_error, SqlitePool};

const SELECT_COLUMNS: &str = "SELECT id, owner_id, external_id, series_id, title, start_at, end_at,
        participants, context, external_modified_at, is_cancelled, is_synced, created_at, updated_at
 FROM meetings";

pub struct SqliteMeetingRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteMeetingRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<MeetingRecord> {
    Ok(MeetingRecord {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        external_id: row.get(2)?,
        fields: MeetingFields {
            series_id: row.get(3)?,
            title: row.get(4)?,
            start: row.get(5)?,
            end: row.get(6)?,
            participants: row.get(7)?,
            context: row.get(8)?,
            external_modified_at: row.get(9)?,
        },
        is_cancelled: row.get(10)?,
        is_synced: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

#[async_trait]
impl MeetingRepository for SqliteMeetingRepository {
    #[instrument(skip(self))]
    async fn find_by_external_id(
        &self,
        owner_id: &str,
        external_id: &str,
    ) -> Result<Option<MeetingRecord>> {
        let pool = Arc::clone(&self.pool);
        let owner_id = owner_id.to_string();
        let external_id = external_id.to_string();

        task::spawn_blocking(move || -> Result<Option<MeetingRecord>> {
            let conn = get_connection(&pool)?;
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE owner_id = ?1 AND external_id = ?2"),
                params![owner_id, external_id],
                map_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip_all, fields(external_id = %record.external_id))]
    async fn create(&self, record: &MeetingRecord) -> Result<()> {
        let pool = Arc::clone(&self.pool);
        let record = record.clone();

        task::spawn_blocking(move || -> Result<()> {
            let conn = get_connection(&pool)?;
            let fields = &record.fields;
            conn.execute(
                "INSERT INTO meetings (
                    id, owner_id, external_id, series_id, title, start_at, end_at,
                    participants, context, external_modified_at, is_cancelled, is_synced,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    record.id,
                    record.owner_id,
                    record.external_id,
                    fields.series_id,
                    fields.title,
                    fields.start,
                    fields.end,
                    fields.participants,
                    fields.context,
                    fields.external_modified_at,
                    record.is_cancelled,
                    record.is_synced,
                    record.created_at,
                    record.updated_at,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip_all, fields(external_id = %record.external_id))]
    async fn update(&self, record: &MeetingRecord) -> Result<()> {
        let pool = Arc::clone(&self.pool);
        let record = record.clone();

        task::spawn_blocking(move || -> Result<()> {
            let conn = get_connection(&pool)?;
            let fields = &record.fields;
            let changed = conn
                .execute(
                    "UPDATE meetings SET
                        series_id = ?2, title = ?3, start_at = ?4, end_at = ?5,
                        participants = ?6, context = ?7, external_modified_at = ?8,
                        is_cancelled = ?9, is_synced = ?10, updated_at = ?11
                     WHERE id = ?1",
                    params![
                        record.id,
                        fields.series_id,
                        fields.title,
                        fields.start,
                        fields.end,
                        fields.participants,
                        fields.context,
                        fields.external_modified_at,
                        record.is_cancelled,
                        record.is_synced,
                        record.updated_at,
                    ],
                )
                .map_err(map_sql_error)?;

            if changed == 0 {
                return Err(CalMirrorError::NotFound(format!("meeting {}", record.id)));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<()> {
        let pool = Arc::clone(&self.pool);
        let id = id.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = get_connection(&pool)?;
            conn.execute("DELETE FROM meetings WHERE id = ?1", params![id]).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<MeetingRecord>> {
        let pool = Arc::clone(&self.pool);
        let owner_id = owner_id.to_string();

        task::spawn_blocking(move || -> Result<Vec<MeetingRecord>> {
            let conn = get_connection(&pool)?;
            let mut stmt = conn
                .prepare(&format!("{SELECT_COLUMNS} WHERE owner_id = ?1 ORDER BY start_at, external_id"))
                .map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params![owner_id], map_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }
}
