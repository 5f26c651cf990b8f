//! Test that tokens stop working once their expiry is reached.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_token_valid_until_just_before_expiry() {
    let test = TestApp::new().await;
    let token = test.login_token("admin", "password").await;

    test.time.advance(24 * 60 * 60 - 1);

    let resp = test
        .get("/protected/data", Some(&format!("Bearer {token}")))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_rejected_at_expiry() {
    let test = TestApp::new().await;
    let token = test.login_token("admin", "password").await;

    test.time.advance(24 * 60 * 60);

    let resp = test
        .get("/protected/data", Some(&format!("Bearer {token}")))
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body, json!({"error": "Invalid token"}));
}

#[tokio::test]
async fn test_fresh_login_after_expiry_works() {
    let test = TestApp::new().await;
    let old = test.login_token("admin", "password").await;

    test.time.advance(2 * 24 * 60 * 60);
    let fresh = test.login_token("admin", "password").await;

    let rejected = test
        .get("/protected/data", Some(&format!("Bearer {old}")))
        .await;
    let accepted = test
        .get("/protected/data", Some(&format!("Bearer {fresh}")))
        .await;
    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
    assert_eq!(accepted.status, StatusCode::OK);
}
