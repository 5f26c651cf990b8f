//! Common helpers for end-to-end tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::auth::{AuthService, ErrorBody, InMemoryUserStore, UserStore};
use crate::routes::{AppState, app};
use crate::testing::{test_codec, test_store};
use crate::time::SimulatedTimeSource;

/// A router wired to a simulated clock and an in-memory store seeded with
/// `admin` / `password`.
pub struct TestApp {
    pub router: Router,
    pub time: Arc<SimulatedTimeSource>,
    pub store: Arc<InMemoryUserStore>,
}

/// Status and decoded JSON body of a response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl TestResponse {
    /// Decode the body as the gateway's error shape.
    pub fn error_body(&self) -> ErrorBody {
        serde_json::from_value(self.body.clone()).expect("error body")
    }
}

impl TestApp {
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
    pub async fn new() -> Self {
        let time = Arc::new(SimulatedTimeSource::default());
        let store = Arc::new(test_store());
        store
            .create("admin", "password")
            .await
            .expect("seed user created");

        let auth = AuthService::from_store(test_codec(&time), Arc::clone(&store));
        let router = app(AppState::new(auth));

        Self {
            router,
            time,
            store,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body readable")
            .to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        TestResponse { status, body }
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, authorization: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let request = builder.body(Body::empty()).expect("valid request");
        self.send(request).await
    }

    /// Log in and return the issued token.
    pub async fn login_token(&self, username: &str, password: &str) -> String {
        let response = self
            .post_json(
                "/login",
                &format!(r#"{{"username":"{username}","password":"{password}"}}"#),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {response:?}");
        response.body["token"]
            .as_str()
            .expect("token field")
            .to_string()
    }
}
