//! Extractor configuration
//!
//! Settings are read from a YAML file. API credentials may instead come from
//! the environment, which takes precedence over the file.
//!
//! ```yaml
//! api_base: https://api.fu.do/v1alpha1
//! auth_url: https://auth.fu.do/api
//! api_key: my-key
//! api_secret: my-secret
//! page_size: 500
//! max_retries: 20
//! ```

use crate::auth::Credentials;
use crate::engine::ExtractConfig;
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::pagination::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "POS_API_KEY";

/// Environment variable holding the API secret
pub const API_SECRET_ENV: &str = "POS_API_SECRET";

/// Complete extractor configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Base URL of the collection endpoints
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Token endpoint
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// API key
    #[serde(default)]
    pub api_key: String,

    /// API secret
    #[serde(default)]
    pub api_secret: String,

    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Delay after a timeout or connection failure, in milliseconds
    #[serde(default = "default_timeout_delay")]
    pub timeout_delay_ms: u64,

    /// Delay after an error status, in milliseconds
    #[serde(default = "default_error_delay")]
    pub error_delay_ms: u64,

    /// Delay between full pages, in milliseconds
    #[serde(default = "default_politeness_delay")]
    pub politeness_delay_ms: u64,

    /// Failed attempts tolerated per page (unset = retry forever)
    #[serde(default)]
    pub max_retries: Option<u32>,

    /// User-Agent header override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_api_base() -> String {
    "https://api.fu.do/v1alpha1".to_string()
}

fn default_auth_url() -> String {
    "https://auth.fu.do/api".to_string()
}

fn default_page_size() -> u32 {
    500
}

fn default_request_timeout() -> u64 {
    60
}

fn default_timeout_delay() -> u64 {
    5000
}

fn default_error_delay() -> u64 {
    2000
}

fn default_politeness_delay() -> u64 {
    300
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            auth_url: default_auth_url(),
            api_key: String::new(),
            api_secret: String::new(),
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout(),
            timeout_delay_ms: default_timeout_delay(),
            error_delay_ms: default_error_delay(),
            politeness_delay_ms: default_politeness_delay(),
            max_retries: None,
            user_agent: None,
        }
    }
}

impl std::fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorConfig")
            .field("api_base", &self.api_base)
            .field("auth_url", &self.auth_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[redacted]")
            .field("page_size", &self.page_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl ExtractorConfig {
    /// Load, apply environment overrides and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                ))
            }
        })?;

        let mut config = Self::from_yaml_str(&content)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment credentials, validated
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document without validating it
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Override credentials from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Override credentials from a variable lookup
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.api_key = key;
        }
        if let Some(secret) = lookup(API_SECRET_ENV).filter(|v| !v.is_empty()) {
            self.api_secret = secret;
        }
    }

    /// Check required fields and value ranges
    pub fn validate(&self) -> Result<()> {
        validate_url("api_base", &self.api_base)?;
        validate_url("auth_url", &self.auth_url)?;

        if self.api_key.is_empty() {
            return Err(Error::missing_field(format!("api_key (or {API_KEY_ENV})")));
        }
        if self.api_secret.is_empty() {
            return Err(Error::missing_field(format!(
                "api_secret (or {API_SECRET_ENV})"
            )));
        }
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::invalid_value(
                "request_timeout_secs",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// API credentials
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.api_key.as_str(), self.api_secret.as_str())
    }

    /// HTTP client settings for collection requests
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.api_base.as_str())
            .timeout(Duration::from_secs(self.request_timeout_secs));
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        builder.build()
    }

    /// Retry timing for the page fetcher
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout_delay: Duration::from_millis(self.timeout_delay_ms),
            error_delay: Duration::from_millis(self.error_delay_ms),
            politeness_delay: Duration::from_millis(self.politeness_delay_ms),
            max_retries: self.max_retries,
        }
    }

    /// Extraction settings
    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig::new().with_page_size(self.page_size)
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::missing_field(field));
    }
    Url::parse(value).map_err(|e| Error::invalid_value(field, e.to_string()))?;
    Ok(())
}
