//! Pagination types
//!
//! Query parameters for page-number pagination and the retry timing used
//! between attempts.

use crate::error::{Error, Result};
use crate::http::RequestConfig;
use crate::types::SORT_KEY;
use std::time::Duration;

/// Parameters of a paginated collection request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Collection path under the API base
    pub path: String,
    /// Records per page; a shorter page marks the end
    pub page_size: u32,
    /// Comma-separated relationships to side-load
    pub include: String,
    /// Sort key; must be monotonic for page numbers to stay stable
    pub sort: String,
}

impl PageQuery {
    /// Create a query sorted by creation time with no side-loads
    pub fn new(path: impl Into<String>, page_size: u32) -> Self {
        Self {
            path: path.into(),
            page_size,
            include: String::new(),
            sort: SORT_KEY.to_string(),
        }
    }

    /// Set the include specification
    #[must_use]
    pub fn with_include(mut self, include: impl Into<String>) -> Self {
        self.include = include.into();
        self
    }

    /// Override the sort key
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    /// Request parameters for a 1-based page number
    pub fn request(&self, page: u32) -> RequestConfig {
        let mut config = RequestConfig::new()
            .query("page[size]", self.page_size.to_string())
            .query("page[number]", page.to_string())
            .query("sort", self.sort.as_str());
        if !self.include.is_empty() {
            config = config.query("include", self.include.as_str());
        }
        config
    }

    /// Whether a page with `count` primary records is the last one
    pub fn is_last_page(&self, count: usize) -> bool {
        count < self.page_size as usize
    }
}

/// Fixed delays between attempts and an optional retry bound
///
/// The default retries forever, matching the extractor's baseline contract.
/// Setting `max_retries` makes exhausted pages fail with
/// [`Error::MaxRetriesExceeded`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay after a socket timeout or connection failure
    pub timeout_delay: Duration,
    /// Delay after a non-2xx, non-401 status
    pub error_delay: Duration,
    /// Delay before requesting the page after a full one
    pub politeness_delay: Duration,
    /// Failed attempts tolerated per page; `None` means unbounded
    pub max_retries: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout_delay: Duration::from_secs(5),
            error_delay: Duration::from_secs(2),
            politeness_delay: Duration::from_millis(300),
            max_retries: None,
        }
    }
}

impl RetryPolicy {
    /// Policy with no delays, for tests and local mocks
    pub fn immediate() -> Self {
        Self {
            timeout_delay: Duration::ZERO,
            error_delay: Duration::ZERO,
            politeness_delay: Duration::ZERO,
            max_retries: None,
        }
    }

    /// Bound the number of failed attempts per page
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Fail once `failures` exceeds the bound, if any
    pub fn check(&self, failures: u32, page: u32) -> Result<()> {
        match self.max_retries {
            Some(max_retries) if failures > max_retries => {
                Err(Error::MaxRetriesExceeded { page, max_retries })
            }
            _ => Ok(()),
        }
    }
}
