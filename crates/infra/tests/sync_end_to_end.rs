//! Full sync runs over SQLite and a mocked Graph tenant.
//!
//! Wires the production adapters the same way the CLI does, then drives an
//! initial window scan followed by an incremental delta replay.

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::Arc;

use calmirror_core::{
    ChangeFeedClient, CredentialRefresher, ManualClock, MeetingRepository, ReconciliationEngine,
    SyncLeases, SyncOrchestrator, SyncSettings, SyncStateRepository, TokenCipher,
};
use calmirror_domain::constants::DEFAULT_REFRESH_MARGIN_SECS;
use calmirror_domain::{SyncConfig, SyncType};
use calmirror_infra::{
    build_http_client, GraphCalendarFeed, GraphTokenEndpoint, SqliteMeetingRepository,
    SqliteSyncStateRepository,
};
use chrono::Duration;
use serde_json::json;
use support::{linked_account, now, provider_config, vault, TestDatabase, USER};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Stack {
    db: TestDatabase,
    orchestrator: SyncOrchestrator,
    meetings: SqliteMeetingRepository,
    states: SqliteSyncStateRepository,
}

fn stack(server: &MockServer) -> Stack {
    let db = TestDatabase::new();
    let vault = vault();
    // Cached token is inside the refresh margin, so the first run rotates it.
    db.accounts().save(&linked_account(&vault, Duration::seconds(30))).unwrap();

    let provider = provider_config(&server.uri());
    let http = build_http_client(&SyncConfig::default()).unwrap();
    let clock = Arc::new(ManualClock::new(now()));
    let pool = db.manager.pool().clone();
    let cipher: Arc<dyn TokenCipher> = vault;

    let refresher = CredentialRefresher::new(
        Arc::new(db.accounts()),
        Arc::new(GraphTokenEndpoint::new(http.clone(), &provider)),
        cipher,
        clock.clone(),
        DEFAULT_REFRESH_MARGIN_SECS,
    );
    let orchestrator = SyncOrchestrator::new(
        Arc::new(refresher),
        ChangeFeedClient::new(Arc::new(GraphCalendarFeed::new(http, &provider))),
        ReconciliationEngine::new(Arc::new(SqliteMeetingRepository::new(pool.clone())), clock.clone()),
        Arc::new(SqliteSyncStateRepository::new(pool.clone())),
        clock,
        SyncLeases::new(),
        SyncSettings::default(),
    );

    Stack {
        db,
        orchestrator,
        meetings: SqliteMeetingRepository::new(pool.clone()),
        states: SqliteSyncStateRepository::new(pool),
    }
}

fn event(id: &str, subject: &str) -> serde_json::Value {
    json!({
        "id": id,
        "subject": subject,
        "start": { "dateTime": "2025-03-11T09:00:00.0000000", "timeZone": "UTC" },
        "end": { "dateTime": "2025-03-11T09:30:00.0000000", "timeZone": "UTC" },
        "organizer": { "emailAddress": { "address": "lead@corp.io", "name": "Lead" } },
        "attendees": [],
        "lastModifiedDateTime": "2025-03-09T08:00:00Z"
    })
}

#[tokio::test]
async fn initial_then_incremental_run() {
    let server = MockServer::start().await;
    let delta = format!("{}/v1.0/me/calendarView/delta?$deltatoken=C1", server.uri());
    let next_delta = format!("{}/v1.0/me/calendarView/delta?$deltatoken=C2", server.uri());

    Mock::given(method("POST"))
        .and(path("/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-access",
            "refresh_token": "refresh-2",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/me/calendarView/delta"))
        .and(query_param_is_missing("$deltatoken"))
        .and(header("authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [event("evt-1", "Standup"), event("evt-2", "Design review")],
            "@odata.deltaLink": delta
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/me/calendarView/delta"))
        .and(query_param("$deltatoken", "C1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "id": "evt-1", "@removed": { "reason": "deleted" } },
                { "id": "evt-2", "isCancelled": true, "subject": "Design review" }
            ],
            "@odata.deltaLink": next_delta
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stack = stack(&server);

    let first = stack.orchestrator.run(USER).await.unwrap();
    assert_eq!(first.sync_type, SyncType::Initial);
    assert_eq!(first.statistics.created, 2);
    assert!(first.has_cursor);
    assert_eq!(stack.meetings.list_for_owner(USER).await.unwrap().len(), 2);
    assert_eq!(stack.states.find(USER).await.unwrap().unwrap().cursor, Some(delta));

    let second = stack.orchestrator.run(USER).await.unwrap();
    assert_eq!(second.sync_type, SyncType::Incremental);
    assert_eq!(second.range, first.range);
    assert_eq!(second.statistics.deleted, 2);

    let remaining = stack.meetings.list_for_owner(USER).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].external_id, "evt-2");
    assert!(remaining[0].is_cancelled);
    assert_eq!(stack.states.find(USER).await.unwrap().unwrap().cursor, Some(next_delta));
}

#[tokio::test]
async fn expired_cursor_is_cleared_in_the_database() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-access",
            "expires_in": 3600
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(410).set_body_string("syncStateNotFound"))
        .mount(&server)
        .await;

    let stack = stack(&server);
    let window = calmirror_domain::SyncWindow::around(now(), 7, 14);
    stack
        .states
        .save(&calmirror_domain::SyncState {
            user_id: USER.into(),
            cursor: Some(format!("{}/v1.0/me/calendarView/delta?$deltatoken=old", server.uri())),
            window,
            last_synced_at: Some(now() - Duration::days(1)),
        })
        .await
        .unwrap();

    let err = stack.orchestrator.run(USER).await.unwrap_err();
    assert_eq!(err.remote_status(), Some(410));

    let state = stack.states.find(USER).await.unwrap().unwrap();
    assert_eq!(state.cursor, None);
    assert_eq!(state.window, window);
}
