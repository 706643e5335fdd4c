//! Engine types
//!
//! Configuration and run statistics for the extractor.

use crate::document::Page;
use crate::types::{Collection, SORT_KEY};
use std::collections::HashSet;
use tracing::info;

/// Configuration for an extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Records requested per page
    pub page_size: u32,
    /// Stop after this many pages (None = until the collection ends)
    pub max_pages: Option<u32>,
    /// Include list override; the collection default is used when unset
    pub include: Option<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            page_size: 500,
            max_pages: None,
            include: None,
        }
    }
}

impl ExtractConfig {
    /// Create a new extract config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page size
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Set max pages
    #[must_use]
    pub fn with_max_pages(mut self, max: u32) -> Self {
        self.max_pages = Some(max);
        self
    }

    /// Override the include list
    #[must_use]
    pub fn with_include(mut self, include: impl Into<String>) -> Self {
        self.include = Some(include.into());
        self
    }

    /// Include list to request for a collection
    pub fn include_for(&self, collection: Collection) -> &str {
        self.include
            .as_deref()
            .unwrap_or_else(|| collection.default_include())
    }
}

/// Statistics from an extraction run
#[derive(Debug, Clone, Default)]
pub struct ExtractStats {
    /// Pages fetched
    pub pages_fetched: usize,
    /// Primary resources fetched
    pub records_fetched: usize,
    /// Rows produced
    pub rows_written: usize,
    /// `createdAt` of the first record seen
    pub first_created_at: Option<String>,
    /// `createdAt` of the last record seen
    pub last_created_at: Option<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Distinct primary ids
    seen_ids: HashSet<String>,
}

impl ExtractStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a fetched page
    pub fn add_page(&mut self, page: &Page) {
        self.pages_fetched += 1;
        self.records_fetched += page.len();
        self.seen_ids
            .extend(page.primary.iter().map(|r| r.id.clone()));

        if self.first_created_at.is_none() {
            self.first_created_at = page
                .primary
                .first()
                .map(|r| r.attr_str(SORT_KEY))
                .filter(|s| !s.is_empty());
        }
        let last = page.last_created_at();
        if !last.is_empty() {
            self.last_created_at = Some(last);
        }
    }

    /// Add rows
    pub fn add_rows(&mut self, count: usize) {
        self.rows_written += count;
    }

    /// Number of distinct primary ids fetched
    ///
    /// Lower than `records_fetched` when page boundaries shifted during the
    /// run and a record was served twice.
    pub fn unique_records(&self) -> usize {
        self.seen_ids.len()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }

    /// Log the end-of-run summary
    pub fn log_summary(&self, collection: Collection) {
        info!(
            "Completed {collection}: {} rows from {} records ({} unique) in {} pages, {}ms",
            self.rows_written,
            self.records_fetched,
            self.unique_records(),
            self.pages_fetched,
            self.duration_ms
        );
        if let (Some(first), Some(last)) = (&self.first_created_at, &self.last_created_at) {
            info!("Date range: {first} to {last}");
        }
    }
}
