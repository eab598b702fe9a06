use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calmirror_core::{CalendarFeed, FeedRequest, TokenEndpoint};
use calmirror_domain::{
    CalMirrorError, EventPage, GraphDateTime, GraphEvent, Result as DomainResult, TokenGrant,
};

/// Provider mock that replays a fixed script of pages.
///
/// Every request is recorded so tests can assert which mode the orchestrator
/// chose and which URL it replayed.
#[derive(Default, Clone)]
pub struct ScriptedCalendarFeed {
    pages: Arc<Mutex<VecDeque<DomainResult<EventPage>>>>,
    requests: Arc<Mutex<Vec<(String, FeedRequest)>>>,
}

impl ScriptedCalendarFeed {
    pub fn new(pages: Vec<DomainResult<EventPage>>) -> Self {
        Self { pages: Arc::new(Mutex::new(pages.into())), ..Self::default() }
    }

    pub fn requests(&self) -> Vec<FeedRequest> {
        self.requests.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }
}

#[async_trait]
impl CalendarFeed for ScriptedCalendarFeed {
    async fn fetch_page(&self, access_token: &str, request: &FeedRequest) -> DomainResult<EventPage> {
        self.requests.lock().unwrap().push((access_token.to_string(), request.clone()));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CalMirrorError::Internal("no scripted page left".into())))
    }
}

/// Token endpoint mock returning one configured outcome.
#[derive(Clone)]
pub struct MockTokenEndpoint {
    outcome: Arc<Mutex<DomainResult<TokenGrant>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTokenEndpoint {
    pub fn granting(access_token: &str, refresh_token: Option<&str>, expires_in: i64) -> Self {
        Self::with_outcome(Ok(TokenGrant {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.map(str::to_string),
            expires_in,
            token_type: None,
        }))
    }

    pub fn failing(status: u16, body: &str) -> Self {
        Self::with_outcome(Err(CalMirrorError::TokenRefresh { status, body: body.to_string() }))
    }

    fn with_outcome(outcome: DomainResult<TokenGrant>) -> Self {
        Self { outcome: Arc::new(Mutex::new(outcome)), calls: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Refresh tokens presented to the endpoint, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenEndpoint for MockTokenEndpoint {
    async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenGrant> {
        self.calls.lock().unwrap().push(refresh_token.to_string());
        self.outcome.lock().unwrap().clone()
    }
}

// ---------------------------------------------------------------------------
// Provider payload builders
// ---------------------------------------------------------------------------

pub fn utc(date_time: &str) -> Option<GraphDateTime> {
    Some(GraphDateTime { date_time: date_time.to_string(), time_zone: Some("UTC".into()) })
}

/// A complete timed event on 2025-03-03, 09:00-10:00 UTC.
pub fn live_event(id: &str, subject: &str) -> GraphEvent {
    GraphEvent {
        id: id.to_string(),
        subject: Some(subject.to_string()),
        start: utc("2025-03-03T09:00:00.0000000"),
        end: utc("2025-03-03T10:00:00.0000000"),
        last_modified_date_time: Some("2025-03-01T08:00:00Z".into()),
        ..GraphEvent::default()
    }
}

pub fn tombstone(id: &str) -> GraphEvent {
    GraphEvent { id: id.to_string(), ..GraphEvent::default() }
}

pub fn cancelled(id: &str) -> GraphEvent {
    GraphEvent { is_cancelled: Some(true), ..live_event(id, "Cancelled: sync") }
}

pub fn page(events: Vec<GraphEvent>, next: Option<&str>, delta: Option<&str>) -> DomainResult<EventPage> {
    Ok(EventPage {
        value: events,
        next_link: next.map(str::to_string),
        delta_link: delta.map(str::to_string),
    })
}
