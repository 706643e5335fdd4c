//! Pagination module
//!
//! Page-number pagination with a stable sort key, in-place retries and
//! transparent re-authentication.
//!
//! # Overview
//!
//! `PageFetcher::fetch_all` yields pages lazily until a short or empty page
//! signals the end of the collection. A page shorter than the requested size
//! is taken as the last one; rows inserted upstream during a long run can
//! still shift page boundaries.

mod fetcher;
mod types;

pub use fetcher::PageFetcher;
pub use types::{PageQuery, RetryPolicy};
