//! Page fetcher implementation
//!
//! Drives page-number pagination over one collection. Each page is retried
//! in place until it succeeds: timeouts and error statuses wait a fixed delay,
//! a 401 re-authenticates first. The page number only advances after a full
//! page has been yielded.

use super::types::{PageQuery, RetryPolicy};
use crate::auth::AuthSession;
use crate::document::Page;
use crate::error::{Error, Result};
use crate::http::{HttpClient, Outcome};
use futures::stream::{self, Stream};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Fetches the pages of a collection in order
#[derive(Debug)]
pub struct PageFetcher {
    client: HttpClient,
    session: Arc<AuthSession>,
    policy: RetryPolicy,
}

/// Progress carried between pages of one `fetch_all` run
#[derive(Debug, Clone, Copy)]
struct Cursor {
    next: Option<u32>,
    total: u64,
}

impl PageFetcher {
    /// Create a fetcher
    pub fn new(client: HttpClient, session: Arc<AuthSession>, policy: RetryPolicy) -> Self {
        Self {
            client,
            session,
            policy,
        }
    }

    /// The auth session requests are signed with
    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// The retry policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Lazily fetch every page of a collection, starting at page 1
    ///
    /// The stream ends after an empty page (not yielded) or after a page
    /// shorter than `page_size` (yielded). The next request is only sent
    /// when the consumer polls again, so pages are strictly sequential.
    /// A fatal error is yielded once and ends the stream.
    pub fn fetch_all<'a>(&'a self, query: PageQuery) -> impl Stream<Item = Result<Page>> + 'a {
        let start = Cursor {
            next: Some(1),
            total: 0,
        };

        stream::try_unfold(start, move |cursor| {
            let query = query.clone();
            async move { self.advance(&query, cursor).await }
        })
    }

    async fn advance(&self, query: &PageQuery, cursor: Cursor) -> Result<Option<(Page, Cursor)>> {
        let Some(number) = cursor.next else {
            return Ok(None);
        };
        if number > 1 {
            pause(self.policy.politeness_delay).await;
        }

        let page = self.fetch_page(query, number).await?;
        if page.is_empty() {
            info!("Page {number}: no records, done");
            return Ok(None);
        }

        let total = cursor.total + page.len() as u64;
        info!(
            "Page {}: {} records (total: {}) | last: {}",
            number,
            page.len(),
            total,
            page.last_created_at()
        );

        let next = if query.is_last_page(page.len()) {
            None
        } else {
            Some(number + 1)
        };
        Ok(Some((page, Cursor { next, total })))
    }

    /// Fetch one page, retrying in place until it succeeds
    pub async fn fetch_page(&self, query: &PageQuery, number: u32) -> Result<Page> {
        let mut failures = 0u32;

        loop {
            let bearer = self.session.bearer().await?;
            let request = query.request(number).bearer(bearer);

            let delay = match self.client.get(&query.path, request).await? {
                Outcome::Success(body) => {
                    let mut page: Page = serde_json::from_str(&body).map_err(|e| {
                        Error::decode(format!("Page {number} of '{}': {e}", query.path))
                    })?;
                    page.number = number;
                    return Ok(page);
                }
                Outcome::Unauthorized => {
                    warn!("Token rejected on page {number}, re-authenticating");
                    self.session.refresh().await?;
                    Duration::ZERO
                }
                Outcome::Timeout => {
                    warn!(
                        "Timeout on page {number}, retrying in {:?}",
                        self.policy.timeout_delay
                    );
                    self.policy.timeout_delay
                }
                Outcome::Unreachable(reason) => {
                    warn!(
                        "Connection failed on page {number} ({reason}), retrying in {:?}",
                        self.policy.timeout_delay
                    );
                    self.policy.timeout_delay
                }
                Outcome::Status { status, body } => {
                    warn!(
                        "Error {status} on page {number}: {body}, retrying in {:?}",
                        self.policy.error_delay
                    );
                    self.policy.error_delay
                }
            };

            failures += 1;
            self.policy.check(failures, number)?;
            pause(delay).await;
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
