//! CLI module
//!
//! Command-line interface for running extractions.
//!
//! # Commands
//!
//! - `check` - Authenticate against the API
//! - `collections` - List supported collections
//! - `extract` - Extract one collection as JSON lines

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::{collections_catalog, extract_collection, Runner};
