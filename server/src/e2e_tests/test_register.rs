//! Test the `/register` endpoint.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_register_returns_created() {
    let test = TestApp::new().await;

    let resp = test
        .post_json("/register", r#"{"username":"alice","password":"wonderland"}"#)
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body, json!({"message": "User registered"}));
    assert!(test.store.contains("alice").await);
}

#[tokio::test]
async fn test_register_does_not_issue_token() {
    let test = TestApp::new().await;

    let resp = test
        .post_json("/register", r#"{"username":"alice","password":"wonderland"}"#)
        .await;

    assert!(resp.body.get("token").is_none());
}

#[tokio::test]
async fn test_registered_user_can_log_in() {
    let test = TestApp::new().await;
    test.post_json("/register", r#"{"username":"alice","password":"wonderland"}"#)
        .await;

    let token = test.login_token("alice", "wonderland").await;

    let resp = test.get("/protected/me", Some(&format!("Bearer {token}"))).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["username"], "alice");
}

#[tokio::test]
async fn test_register_duplicate_user() {
    let test = TestApp::new().await;

    let resp = test
        .post_json("/register", r#"{"username":"admin","password":"other"}"#)
        .await;

    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(resp.body, json!({"error": "User already exists"}));
}

#[tokio::test]
async fn test_register_empty_password() {
    let test = TestApp::new().await;

    let resp = test
        .post_json("/register", r#"{"username":"alice","password":""}"#)
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(!test.store.contains("alice").await);
}

#[tokio::test]
async fn test_register_malformed_body() {
    let test = TestApp::new().await;

    let resp = test.post_json("/register", "not json").await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(!resp.error_body().error.is_empty());
}
