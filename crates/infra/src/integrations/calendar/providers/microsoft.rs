//! Microsoft Graph provider implementation

use async_trait::async_trait;
use calmirror_core::{CalendarFeed, FeedRequest, TokenEndpoint};
use calmirror_domain::constants::REFRESH_GRANT_TYPE;
use calmirror_domain::{CalMirrorError, EventPage, ProviderConfig, Result, SyncWindow, TokenGrant};
use chrono::SecondsFormat;
use reqwest::{Client, Response};
use tracing::{debug, instrument};

use crate::errors::InfraError;

const OUTLOOK_TIMEZONE_HEADER: &str = r#"outlook.timezone="UTC""#;

/// Change-feed transport over `/me/calendarView/delta`.
#[derive(Clone)]
pub struct GraphCalendarFeed {
    client: Client,
    api_base: String,
    page_size: u32,
}

impl GraphCalendarFeed {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            page_size: config.page_size.max(1),
        }
    }

    /// The delta endpoint accepts only the window bounds; page size travels
    /// in the `Prefer` header.
    fn window_query(window: &SyncWindow) -> [(&'static str, String); 2] {
        [
            ("startDateTime", window.start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("endDateTime", window.end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ]
    }
}

#[async_trait]
impl CalendarFeed for GraphCalendarFeed {
    #[instrument(skip(self, access_token))]
    async fn fetch_page(&self, access_token: &str, request: &FeedRequest) -> Result<EventPage> {
        let builder = match request {
            FeedRequest::Window(window) => self
                .client
                .get(format!("{}/me/calendarView/delta", self.api_base))
                .query(&Self::window_query(window)),
            // Provider-issued links already carry every query parameter.
            FeedRequest::Link(url) => self.client.get(url),
        };

        let response = builder
            .bearer_auth(access_token)
            .header("Prefer", OUTLOOK_TIMEZONE_HEADER)
            .header("Prefer", format!("odata.maxpagesize={}", self.page_size))
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let (status, body) = failure_parts(response).await;
            return Err(CalMirrorError::RemoteFeed { status, body });
        }

        let page: EventPage = response.json().await.map_err(InfraError::from)?;
        debug!(
            events = page.value.len(),
            has_next = page.next_link.is_some(),
            has_delta = page.delta_link.is_some(),
            "page received"
        );
        Ok(page)
    }
}

/// Refresh-token grant against the Microsoft identity platform.
#[derive(Clone)]
pub struct GraphTokenEndpoint {
    client: Client,
    token_endpoint: String,
    client_id: String,
    client_secret: Option<String>,
    scope: String,
}

impl GraphTokenEndpoint {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            token_endpoint: config.token_endpoint.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone().filter(|s| !s.is_empty()),
            scope: config.scope.clone(),
        }
    }
}

#[async_trait]
impl TokenEndpoint for GraphTokenEndpoint {
    /// Exchange a refresh token.
    ///
    /// Every failure, including a transport error with no response (status
    /// `0`), surfaces as `TokenRefresh` so callers can tell it apart from
    /// a missing or undecryptable credential.
    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant> {
        let mut form = vec![
            ("client_id", self.client_id.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", REFRESH_GRANT_TYPE),
            ("scope", self.scope.as_str()),
        ];
        if let Some(secret) = self.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let response = self
            .client
            .post(&self.token_endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| CalMirrorError::TokenRefresh { status: 0, body: e.to_string() })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let (status, body) = failure_parts(response).await;
            return Err(CalMirrorError::TokenRefresh { status, body });
        }

        response.json::<TokenGrant>().await.map_err(|e| CalMirrorError::TokenRefresh {
            status,
            body: format!("invalid token response: {e}"),
        })
    }
}

async fn failure_parts(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
    (status, body)
}
