//! Provider event normalization.
//!
//! Pure mapping from Graph's wire shape to [`NormalizedEvent`]. Requests ask
//! Graph for UTC (`Prefer: outlook.timezone="UTC"`), so timed instants are
//! parsed as-is and no time-zone math happens here.

use calmirror_domain::constants::{CONTEXT_SEPARATOR, PARTICIPANT_SEPARATOR, UNTITLED_EVENT};
use calmirror_domain::{
    GraphDateTime, GraphEvent, GraphRecipient, LiveEvent, NormalizedEvent,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Classify and map one provider event.
///
/// Tombstone when the entry has no title, start or end (or Graph flagged it
/// `@removed`); cancelled when `isCancelled` is set; live otherwise.
pub fn normalize_event(event: &GraphEvent) -> NormalizedEvent {
    let external_id = event.id.clone();

    if is_tombstone(event) {
        return NormalizedEvent::Tombstone { external_id };
    }

    if event.is_cancelled == Some(true) {
        return NormalizedEvent::Cancelled { external_id };
    }

    let organizer = event.organizer.as_ref().and_then(recipient_address);

    NormalizedEvent::Live(LiveEvent {
        external_id,
        series_id: event.series_master_id.clone().filter(|s| !s.is_empty()),
        title: non_blank(event.subject.as_deref()).unwrap_or(UNTITLED_EVENT).to_string(),
        start: event.start.as_ref().and_then(|dt| normalize_instant(dt, event.is_all_day)),
        end: event.end.as_ref().and_then(|dt| normalize_instant(dt, event.is_all_day)),
        participants: merge_participants(
            organizer,
            event.attendees.as_deref().unwrap_or_default(),
        ),
        context: compose_context(
            organizer,
            event.location.as_ref().and_then(|l| non_blank(l.display_name.as_deref())),
            event.online_meeting.as_ref().and_then(|m| non_blank(m.join_url.as_deref())),
        ),
        external_modified_at: event.last_modified_date_time.as_deref().and_then(parse_timestamp),
    })
}

fn is_tombstone(event: &GraphEvent) -> bool {
    event.removed.is_some()
        || (non_blank(event.subject.as_deref()).is_none()
            && event.start.is_none()
            && event.end.is_none())
}

/// Map a provider date-time to a UTC instant.
///
/// All-day values keep only their calendar date, at midnight UTC. Timed
/// values without an explicit offset are read as UTC. Unparseable input
/// yields `None`.
pub fn normalize_instant(value: &GraphDateTime, is_all_day: bool) -> Option<DateTime<Utc>> {
    if is_all_day {
        parse_all_day(&value.date_time)
    } else {
        parse_timestamp(&value.date_time)
    }
}

fn parse_all_day(value: &str) -> Option<DateTime<Utc>> {
    let date_part = value.trim().get(..10)?;
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    Some(date.and_time(NaiveTime::MIN).and_utc())
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let has_explicit_timezone = trimmed.ends_with('Z')
        || trimmed
            .rfind('T')
            .is_some_and(|idx| trimmed[idx + 1..].chars().any(|c| matches!(c, '+' | '-')));

    let candidate =
        if has_explicit_timezone { trimmed.to_string() } else { format!("{trimmed}Z") };

    DateTime::parse_from_rfc3339(&candidate).ok().map(|dt| dt.with_timezone(&Utc))
}

/// Organizer first, then attendees in order, de-duplicated by exact match.
pub fn merge_participants(organizer: Option<&str>, attendees: &[GraphRecipient]) -> String {
    let mut merged: Vec<&str> = Vec::with_capacity(attendees.len() + 1);

    for address in organizer.into_iter().chain(attendees.iter().filter_map(recipient_address)) {
        if !merged.contains(&address) {
            merged.push(address);
        }
    }

    merged.join(PARTICIPANT_SEPARATOR)
}

/// Labeled organizer / location / join-link fragments joined with `" | "`.
pub fn compose_context(
    organizer: Option<&str>,
    location: Option<&str>,
    join_url: Option<&str>,
) -> Option<String> {
    let fragments: Vec<String> = [("Organizer", organizer), ("Location", location), ("Join", join_url)]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| format!("{label}: {v}")))
        .collect();

    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join(CONTEXT_SEPARATOR))
    }
}

/// Address as sent; only blank addresses are dropped.
fn recipient_address(recipient: &GraphRecipient) -> Option<&str> {
    recipient.email_address.address.as_deref().filter(|a| !a.trim().is_empty())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
