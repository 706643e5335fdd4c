//! Auth types
//!
//! Credentials sent to the token endpoint and the bearer token it returns.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// API credentials exchanged for a bearer token
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// API key
    #[serde(rename = "apiKey")]
    pub api_key: String,
    /// API secret
    #[serde(rename = "apiSecret")]
    pub api_secret: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Bearer token with optional expiration
///
/// Tokens are replaced wholesale on refresh, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The bearer value
    pub value: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl Token {
    /// Create a new token
    pub fn new(value: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(value: impl Into<String>, seconds: i64) -> Self {
        Self::new(value, Some(Utc::now() + chrono::Duration::seconds(seconds)))
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false, // No expiration = only replaced on 401
        }
    }
}

/// Token endpoint response: `{token, exp}`
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub exp: Option<Value>,
}

impl TokenResponse {
    /// `exp` is a unix timestamp in seconds, as a number or numeric string
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let seconds = match self.exp.as_ref()? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
            Value::String(s) => s.trim().parse::<i64>().ok()?,
            _ => return None,
        };
        Utc.timestamp_opt(seconds, 0).single()
    }
}
