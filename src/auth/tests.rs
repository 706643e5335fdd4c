//! Tests for the auth module

use super::*;
use crate::error::Error;
use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials() -> Credentials {
    Credentials::new("key-123", "secret-456")
}

#[tokio::test]
async fn test_authenticate_posts_credentials() {
    let mock_server = MockServer::start().await;
    let exp = Utc::now().timestamp() + 86_400;

    Mock::given(method("POST"))
        .and(path("/api"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"apiKey": "key-123", "apiSecret": "secret-456"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-abc",
            "exp": exp
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::new();
    let token = authenticate(&client, &format!("{}/api", mock_server.uri()), &credentials())
        .await
        .unwrap();

    assert_eq!(token.value, "tok-abc");
    assert_eq!(token.expires_at.unwrap().timestamp(), exp);
    assert!(!token.is_expired());
}

#[tokio::test]
async fn test_authenticate_rejected_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(403).set_body_string("bad credentials"))
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::new();
    let err = authenticate(&client, &format!("{}/api", mock_server.uri()), &credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Auth { .. }));
    assert!(err.to_string().contains("403"));
}

#[tokio::test]
async fn test_authenticate_without_token_field_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"exp": 1})))
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::new();
    let result = authenticate(&client, &mock_server.uri(), &credentials()).await;
    assert!(matches!(result, Err(Error::Auth { .. })));
}

#[tokio::test]
async fn test_authenticate_unreachable_is_auth_error() {
    let client = reqwest::Client::new();
    // Port 9 (discard) is not expected to run an HTTP server
    let result = authenticate(&client, "http://127.0.0.1:9/api", &credentials()).await;
    assert!(matches!(result, Err(Error::Auth { .. })));
}

#[tokio::test]
async fn test_session_refresh_replaces_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-1"})))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-2"})))
        .mount(&mock_server)
        .await;

    let session = AuthSession::connect(
        format!("{}/api", mock_server.uri()),
        credentials(),
        reqwest::Client::new(),
    )
    .await
    .unwrap();
    assert_eq!(session.token().await.value, "tok-1");
    assert_eq!(session.bearer().await.unwrap(), "tok-1");

    let refreshed = session.refresh().await.unwrap();
    assert_eq!(refreshed.value, "tok-2");
    assert_eq!(session.token().await, refreshed);
}

#[tokio::test]
async fn test_bearer_refreshes_expired_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = AuthSession::with_token(
        format!("{}/api", mock_server.uri()),
        credentials(),
        reqwest::Client::new(),
        Token::expires_in("stale", -60),
    );

    assert_eq!(session.bearer().await.unwrap(), "fresh");
    // No expiry on the fresh token, so no further refresh
    assert_eq!(session.bearer().await.unwrap(), "fresh");
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let session = AuthSession::with_token(
        mock_server.uri(),
        credentials(),
        reqwest::Client::new(),
        Token::new("original", None),
    );

    assert!(matches!(session.refresh().await, Err(Error::Auth { .. })));
    assert_eq!(session.token().await.value, "original");
}
