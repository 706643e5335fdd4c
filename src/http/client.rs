//! HTTP client for collection requests
//!
//! Sends one GET per call and classifies the result so the page fetcher can
//! decide between yielding, re-authenticating and retrying:
//! - 2xx: body returned as text
//! - 401: `Unauthorized`
//! - any other status: `Status` with a truncated body for logs
//! - socket timeout: `Timeout`
//! - any other transport failure (refused, reset, closed mid-response):
//!   `Unreachable`

use crate::error::{Error, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Longest body excerpt kept for failed responses
const BODY_EXCERPT_CHARS: usize = 200;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Per-request socket timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(60),
            user_agent: format!("pos-extract/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, sent in insertion order
    pub query: Vec<(String, String)>,
    /// Bearer token for the `Authorization` header
    pub bearer: Option<String>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the bearer token
    #[must_use]
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// Classified result of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx with the response body
    Success(String),
    /// 401, the bearer token was rejected
    Unauthorized,
    /// Any other non-2xx status
    Status {
        /// HTTP status code
        status: u16,
        /// First characters of the body
        body: String,
    },
    /// The socket timed out
    Timeout,
    /// The connection failed, was reset or closed before a full response
    Unreachable(String),
}

/// HTTP client for read-only collection requests
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Send a GET request and classify the result
    ///
    /// Only request construction errors are returned as `Err`; everything
    /// the fetcher can retry is an [`Outcome`].
    pub async fn get(&self, path: &str, config: RequestConfig) -> Result<Outcome> {
        let full_url = self.build_url(path);

        let mut req = self
            .client
            .get(&full_url)
            .header("Accept", "application/json");

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        if let Some(ref token) = config.bearer {
            req = req.bearer_auth(token);
        }

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) => return classify_transport_error(e),
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Ok(Outcome::Unauthorized);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return classify_transport_error(e),
        };

        if !status.is_success() {
            return Ok(Outcome::Status {
                status: status.as_u16(),
                body: body.chars().take(BODY_EXCERPT_CHARS).collect(),
            });
        }

        debug!("Request succeeded: GET {}", full_url);
        Ok(Outcome::Success(body))
    }

    /// Build full URL from path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Only a request that could not be built is an error; every network
/// failure is retryable
fn classify_transport_error(e: reqwest::Error) -> Result<Outcome> {
    if e.is_builder() {
        return Err(Error::Http(e));
    }
    if e.is_timeout() {
        return Ok(Outcome::Timeout);
    }
    Ok(Outcome::Unreachable(e.to_string()))
}
