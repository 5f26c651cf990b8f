//! HTTP surface of the gateway.
//!
//! Public routes: `POST /register`, `POST /login`, `GET /health`.
//! Protected routes live under `/protected` and sit behind
//! `require_bearer_token`.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::auth::{
    AuthError, AuthService, AuthenticatedUser, Claims, Credentials, LoginToken, RegistrationAck,
    require_bearer_token,
};

/// State shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthService>,
}

impl AppState {
    #[must_use]
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }
}

/// Body of `GET /protected/data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedData {
    pub data: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Build the full router.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/data", get(protected_data))
        .route("/me", get(whoami))
        .route_layer(from_fn_with_state(state.clone(), require_bearer_token));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/health", get(health))
        .nest("/protected", protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<RegistrationAck>), AuthError> {
    let Json(credentials) = payload?;
    let ack = state.auth.register(&credentials).await?;
    Ok((StatusCode::CREATED, Json(ack)))
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginToken>, AuthError> {
    let Json(credentials) = payload?;
    let token = state.auth.login(&credentials).await?;
    Ok(Json(token))
}

async fn protected_data(AuthenticatedUser(claims): AuthenticatedUser) -> Json<ProtectedData> {
    tracing::debug!("serving protected data to '{}'", claims.username);
    Json(ProtectedData {
        data: "This is protected data".to_string(),
    })
}

async fn whoami(AuthenticatedUser(claims): AuthenticatedUser) -> Json<Claims> {
    Json(claims)
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}
