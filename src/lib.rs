// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pos-extract
//!
//! Extracts point-of-sale data from a JSON:API style REST API and turns the
//! relationship graph into flat, analysis-ready rows.
//!
//! ## Features
//!
//! - **Bearer Auth**: Key/secret exchange with refresh on expiry or 401
//! - **Page-Number Pagination**: Stable `createdAt` sort, in-place retries
//! - **Side-Load Resolution**: Per-page index of `included` resources
//! - **Denormalization**: One row per sale item, one row per reference record
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pos_extract::config::ExtractorConfig;
//! use pos_extract::cli::extract_collection;
//! use pos_extract::Collection;
//!
//! #[tokio::main]
//! async fn main() -> pos_extract::Result<()> {
//!     let config = ExtractorConfig::load("pos.yaml")?;
//!     let stats = extract_collection(
//!         &config,
//!         config.extract_config(),
//!         Collection::Sales,
//!         Some("sales.jsonl".as_ref()),
//!     )
//!     .await?;
//!     println!("{} rows", stats.rows_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Extractor                           │
//! │   fetch page → index included → flatten → write rows         │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌────────────┬─────────────┬───┴──────────┬──────────┬─────────┐
//! │    Auth    │    HTTP     │   Paginate   │ Document │ Flatten │
//! ├────────────┼─────────────┼──────────────┼──────────┼─────────┤
//! │ Key/secret │ GET         │ Page number  │ Resource │ Sales   │
//! │ Refresh    │ Timeouts    │ Retry policy │ Index    │ Refs    │
//! └────────────┴─────────────┴──────────────┴──────────┴─────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the extractor
pub mod error;

/// Common types and type aliases
pub mod types;

/// Token exchange and session
pub mod auth;

/// HTTP client with outcome classification
pub mod http;

/// Page-number pagination with retries
pub mod pagination;

/// Resource documents and the included index
pub mod document;

/// Row flattening
pub mod flatten;

/// Row sinks
pub mod output;

/// Main execution engine
pub mod engine;

/// Extractor configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use engine::{ExtractConfig, ExtractStats, Extractor};
pub use flatten::{Flattener, Row};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
