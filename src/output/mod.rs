//! Output module
//!
//! Destinations for flattened rows.
//!
//! # Overview
//!
//! This module provides:
//! - `RowSink` - Async destination the extractor writes each page of rows to
//! - `JsonLinesSink` - One JSON object per row, columns in schema order
//! - An in-memory sink for `Vec<Row>`

mod writer;

pub use writer::{JsonLinesSink, RowSink};

#[cfg(test)]
mod tests;
