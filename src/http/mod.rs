//! HTTP client module
//!
//! Thin GET client used by the page fetcher.
//!
//! # Features
//!
//! - **Base URL joining**: collection paths are resolved against the API base
//! - **Bearer auth**: the caller passes the current token per request
//! - **Outcome classification**: 2xx, 401, other status, timeout, unreachable
//!
//! Retry timing lives in the pagination module, not here.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, Outcome, RequestConfig};
