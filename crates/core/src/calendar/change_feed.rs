//! Paginated change-feed traversal.
//!
//! Both modes follow `@odata.nextLink` until a page arrives without one and
//! buffer every event before returning. A failed page discards the whole
//! batch, so callers never see partial results.

use std::sync::Arc;

use calmirror_domain::{GraphEvent, Result, SyncWindow};
use tracing::{debug, instrument};

use super::ports::{CalendarFeed, FeedRequest};

/// Events collected across all pages plus the cursor for the next run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedBatch {
    pub events: Vec<GraphEvent>,
    pub cursor: Option<String>,
    pub pages: usize,
}

/// Drives a [`CalendarFeed`] through every page of a scan.
#[derive(Clone)]
pub struct ChangeFeedClient {
    feed: Arc<dyn CalendarFeed>,
}

impl ChangeFeedClient {
    pub fn new(feed: Arc<dyn CalendarFeed>) -> Self {
        Self { feed }
    }

    /// Scan every event in `window`.
    ///
    /// The returned cursor is the terminal `@odata.deltaLink`, if the provider
    /// issued one; otherwise `None` and the next run scans again.
    #[instrument(skip(self, access_token), fields(start = %window.start, end = %window.end))]
    pub async fn fetch_full_window(
        &self,
        access_token: &str,
        window: SyncWindow,
    ) -> Result<FeedBatch> {
        let mut batch = FeedBatch::default();
        let mut request = FeedRequest::Window(window);

        loop {
            let page = self.feed.fetch_page(access_token, &request).await?;
            batch.pages += 1;
            batch.events.extend(page.value);

            if let Some(delta) = page.delta_link {
                batch.cursor = Some(delta);
            }

            match page.next_link {
                Some(next) => request = FeedRequest::Link(next),
                None => break,
            }
        }

        debug!(pages = batch.pages, events = batch.events.len(), "full window fetched");
        Ok(batch)
    }

    /// Replay a stored cursor against the delta feed.
    ///
    /// The returned cursor is the terminal delta link when one was seen,
    /// otherwise the last URL requested.
    #[instrument(skip_all)]
    pub async fn fetch_delta(&self, access_token: &str, cursor: &str) -> Result<FeedBatch> {
        let mut batch = FeedBatch::default();
        let mut url = cursor.to_string();

        let last_requested = loop {
            let page = self.feed.fetch_page(access_token, &FeedRequest::Link(url.clone())).await?;
            batch.pages += 1;
            batch.events.extend(page.value);

            if let Some(delta) = page.delta_link {
                batch.cursor = Some(delta);
            }

            match page.next_link {
                Some(next) => url = next,
                None => break url,
            }
        };

        if batch.cursor.is_none() {
            batch.cursor = Some(last_requested);
        }

        debug!(pages = batch.pages, events = batch.events.len(), "delta fetched");
        Ok(batch)
    }
}
