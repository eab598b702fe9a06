//! Local mirror of a remote calendar event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Meeting row keyed by `(owner_id, external_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRecord {
    pub id: String, // UUIDv7
    pub owner_id: String,
    pub external_id: String,
    #[serde(flatten)]
    pub fields: MeetingFields,
    pub is_cancelled: bool,
    pub is_synced: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Provider-derived fields refreshed on every live observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingFields {
    pub series_id: Option<String>,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub participants: String,
    pub context: Option<String>,
    pub external_modified_at: Option<DateTime<Utc>>,
}

impl MeetingRecord {
    /// Build a freshly synced, non-cancelled record.
    pub fn new(
        owner_id: impl Into<String>,
        external_id: impl Into<String>,
        fields: MeetingFields,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            owner_id: owner_id.into(),
            external_id: external_id.into(),
            fields,
            is_cancelled: false,
            is_synced: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite provider fields and reactivate the record.
    pub fn apply_live(&mut self, fields: MeetingFields, now: DateTime<Utc>) {
        self.fields = fields;
        self.is_cancelled = false;
        self.is_synced = true;
        self.updated_at = now;
    }

    /// Soft-cancel, leaving every other field untouched.
    pub fn mark_cancelled(&mut self, now: DateTime<Utc>) {
        self.is_cancelled = true;
        self.updated_at = now;
    }
}
