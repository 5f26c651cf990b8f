//! Test the `/login` endpoint.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_login_valid_credentials_returns_token() {
    let test = TestApp::new().await;

    let resp = test
        .post_json("/login", r#"{"username":"admin","password":"password"}"#)
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let token = resp.body["token"].as_str().expect("token field");
    assert_eq!(token.split('.').count(), 3);
}

#[tokio::test]
async fn test_login_token_carries_username_and_24h_expiry() {
    let test = TestApp::new().await;
    let issued_at = crate::time::TimeSource::now_secs(test.time.as_ref());

    let token = test.login_token("admin", "password").await;

    let resp = test.get("/protected/me", Some(&format!("Bearer {token}"))).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.body,
        json!({"username": "admin", "exp": issued_at + 24 * 60 * 60})
    );
}

#[tokio::test]
async fn test_login_wrong_password() {
    let test = TestApp::new().await;

    let resp = test
        .post_json("/login", r#"{"username":"admin","password":"wrong"}"#)
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error_body().error, "Invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_user_is_indistinguishable() {
    let test = TestApp::new().await;

    let unknown = test
        .post_json("/login", r#"{"username":"nobody","password":"password"}"#)
        .await;
    let wrong = test
        .post_json("/login", r#"{"username":"admin","password":"wrong"}"#)
        .await;

    assert_eq!(unknown.status, wrong.status);
    assert_eq!(unknown.body, wrong.body);
}

#[tokio::test]
async fn test_login_malformed_json() {
    let test = TestApp::new().await;

    let resp = test.post_json("/login", r#"{"username":"admin""#).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(!resp.error_body().error.is_empty());
}

#[tokio::test]
async fn test_login_missing_field() {
    let test = TestApp::new().await;

    let resp = test.post_json("/login", r#"{"username":"admin"}"#).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(!resp.error_body().error.is_empty());
}

#[tokio::test]
async fn test_login_missing_content_type() {
    let test = TestApp::new().await;
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/login")
        .body(axum::body::Body::from(
            r#"{"username":"admin","password":"password"}"#,
        ))
        .expect("valid request");

    let resp = test.send(request).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}
