//! Execution engine module
//!
//! Main read loop: fetch a page, index its side-loads, flatten, write.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Extractor` - Drives one collection from page 1 to the end
//! - `ExtractConfig` - Page size, page limit and include override
//! - `ExtractStats` - Counters logged at the end of every run
//!
//! Pages are pulled one at a time. The next request is only sent after the
//! current page's rows reached the sink.

mod types;

pub use types::{ExtractConfig, ExtractStats};

use crate::document::{IncludedIndex, Page};
use crate::error::{Error, Result};
use crate::flatten::{flattener_for, Flattener, Row};
use crate::output::RowSink;
use crate::pagination::{PageFetcher, PageQuery};
use crate::types::Collection;
use futures::TryStreamExt;
use std::time::Instant;
use tracing::{error, info};

/// Extraction engine for one API account
#[derive(Debug)]
pub struct Extractor {
    /// Page fetcher
    fetcher: PageFetcher,
    /// Extract configuration
    config: ExtractConfig,
}

impl Extractor {
    /// Create a new extractor
    pub fn new(fetcher: PageFetcher) -> Self {
        Self {
            fetcher,
            config: ExtractConfig::default(),
        }
    }

    /// Set extract configuration
    #[must_use]
    pub fn with_config(mut self, config: ExtractConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the page fetcher
    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    /// Get the extract configuration
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Page query for a collection
    pub fn query_for(&self, collection: Collection) -> PageQuery {
        PageQuery::new(collection.api_path(), self.config.page_size)
            .with_include(self.config.include_for(collection))
    }

    /// Extract a collection into memory
    pub async fn extract(&self, collection: Collection) -> Result<(Vec<Row>, ExtractStats)> {
        let mut rows = Vec::new();
        let stats = self.extract_into(collection, &mut rows).await?;
        Ok((rows, stats))
    }

    /// Extract a collection, appending rows to a caller-owned buffer
    ///
    /// On error the rows of every page completed before the failure stay in
    /// `rows`.
    pub async fn extract_into(
        &self,
        collection: Collection,
        rows: &mut Vec<Row>,
    ) -> Result<ExtractStats> {
        self.extract_to(collection, rows).await
    }

    /// Extract a collection, writing each page's rows to a sink
    pub async fn extract_to<S>(&self, collection: Collection, sink: &mut S) -> Result<ExtractStats>
    where
        S: RowSink + ?Sized,
    {
        // A zero page size would never produce a short page
        if self.config.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }

        let start = Instant::now();
        let flattener = flattener_for(collection);
        let query = self.query_for(collection);
        let mut stats = ExtractStats::new();

        info!(
            "Starting extraction for {collection} (page size {}, include '{}')",
            query.page_size, query.include
        );

        let result = self
            .run(flattener.as_ref(), query, sink, &mut stats)
            .await;

        #[allow(clippy::cast_possible_truncation)]
        stats.set_duration(start.elapsed().as_millis() as u64);

        match result {
            Ok(()) => {
                stats.log_summary(collection);
                Ok(stats)
            }
            Err(e) => {
                error!(
                    "Extraction of {collection} aborted after {} pages, {} rows kept: {e}",
                    stats.pages_fetched, stats.rows_written
                );
                Err(e)
            }
        }
    }

    async fn run<S>(
        &self,
        flattener: &dyn Flattener,
        query: PageQuery,
        sink: &mut S,
        stats: &mut ExtractStats,
    ) -> Result<()>
    where
        S: RowSink + ?Sized,
    {
        let pages = self.fetcher.fetch_all(query);
        futures::pin_mut!(pages);

        loop {
            if let Some(max) = self.config.max_pages {
                if stats.pages_fetched >= max as usize {
                    info!("Reached page limit ({max}), stopping");
                    break;
                }
            }

            let Some(page) = pages.try_next().await? else {
                break;
            };

            let page_rows = flatten_page(flattener, &page);
            stats.add_page(&page);
            stats.add_rows(page_rows.len());
            sink.write_rows(&page_rows).await?;
        }

        sink.finish().await
    }
}

/// Flatten every primary resource of a page, in order
///
/// The index is built from this page's `included` and dropped with it.
pub fn flatten_page(flattener: &dyn Flattener, page: &Page) -> Vec<Row> {
    let index = IncludedIndex::build(&page.included);
    page.primary
        .iter()
        .flat_map(|resource| flattener.flatten(resource, &index))
        .collect()
}
