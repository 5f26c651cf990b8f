//! Test the unauthenticated health probe.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_health_ok_without_auth() {
    let test = TestApp::new().await;

    let resp = test.get("/health", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let test = TestApp::new().await;

    let resp = test.get("/nope", None).await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}
