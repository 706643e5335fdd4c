//! Error types for pos-extract
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Transient fetch failures (timeouts, dropped connections, error statuses,
//! 401) are recovered inside the page fetcher and never reach this type
//! unless a bounded retry policy is exhausted.

use thiserror::Error;

/// The main error type for pos-extract
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Max retries ({max_retries}) exceeded for page {page}")]
    MaxRetriesExceeded { page: u32, max_retries: u32 },

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Failed to serialize JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Unknown collection: {name}")]
    UnknownCollection { name: String },

    #[error("Output error: {message}")]
    Output { message: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }
}

/// Result type alias for pos-extract
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("api_key");
        assert_eq!(err.to_string(), "Missing required config field: api_key");

        let err = Error::invalid_value("page_size", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'page_size': must be at least 1"
        );

        let err = Error::MaxRetriesExceeded {
            page: 3,
            max_retries: 5,
        };
        assert_eq!(err.to_string(), "Max retries (5) exceeded for page 3");
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<u32>("[1, 2]").unwrap_err();
        let err: Error = yaml_err.into();
        assert!(matches!(err, Error::YamlParse(_)));
        assert!(err.to_string().starts_with("Failed to parse YAML"));
    }
}
