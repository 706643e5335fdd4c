//! Auth session implementation
//!
//! Owns the current bearer token and replaces it on expiry or on request.

use super::types::{Credentials, Token, TokenResponse};
use crate::error::{Error, Result};
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Holds the bearer token for a run
///
/// The token is written only by [`AuthSession::refresh`] and read before
/// every request. Writes replace the whole value under the lock.
pub struct AuthSession {
    /// Token endpoint URL
    auth_url: String,
    /// Credentials exchanged for tokens
    credentials: Credentials,
    /// Current token
    token: RwLock<Token>,
    /// HTTP client for token requests
    http_client: Client,
}

impl AuthSession {
    /// Authenticate once and start a session with the issued token
    pub async fn connect(
        auth_url: impl Into<String>,
        credentials: Credentials,
        http_client: Client,
    ) -> Result<Self> {
        let auth_url = auth_url.into();
        let token = authenticate(&http_client, &auth_url, &credentials).await?;
        Ok(Self {
            auth_url,
            credentials,
            token: RwLock::new(token),
            http_client,
        })
    }

    /// Start a session from an already issued token
    pub fn with_token(
        auth_url: impl Into<String>,
        credentials: Credentials,
        http_client: Client,
        token: Token,
    ) -> Self {
        Self {
            auth_url: auth_url.into(),
            credentials,
            token: RwLock::new(token),
            http_client,
        }
    }

    /// Exchange the credentials for a fresh token without storing it
    pub async fn authenticate(&self) -> Result<Token> {
        authenticate(&self.http_client, &self.auth_url, &self.credentials).await
    }

    /// Re-authenticate and swap in the new token
    pub async fn refresh(&self) -> Result<Token> {
        let fresh = self.authenticate().await?;
        *self.token.write().await = fresh.clone();
        info!("Token refreshed");
        Ok(fresh)
    }

    /// Snapshot of the current token
    pub async fn token(&self) -> Token {
        self.token.read().await.clone()
    }

    /// Current bearer value, refreshing first if the token has expired
    pub async fn bearer(&self) -> Result<String> {
        {
            let current = self.token.read().await;
            if !current.is_expired() {
                return Ok(current.value.clone());
            }
        }
        debug!("Token expired, refreshing before request");
        Ok(self.refresh().await?.value)
    }

    /// Token endpoint URL
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("auth_url", &self.auth_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Exchange credentials for a bearer token
///
/// Any transport failure, non-success status or missing `token` field is an
/// [`Error::Auth`]. There is no retry here.
pub async fn authenticate(
    http_client: &Client,
    auth_url: &str,
    credentials: &Credentials,
) -> Result<Token> {
    info!("Authenticating against {auth_url}");

    let response = http_client
        .post(auth_url)
        .header("Accept", "application/json")
        .json(credentials)
        .send()
        .await
        .map_err(|e| Error::auth(format!("Token request failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::auth(format!(
            "Token request failed with status {status}: {body}"
        )));
    }

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| Error::auth(format!("Invalid token response: {e}")))?;

    let expires_at = body.expires_at();
    let value = body
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::auth("Token response has no token"))?;

    match expires_at {
        Some(exp) => info!("Token obtained, expires at {exp}"),
        None => info!("Token obtained, no expiry reported"),
    }
    Ok(Token::new(value, expires_at))
}
