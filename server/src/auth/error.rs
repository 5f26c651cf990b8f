//! Externally visible authentication errors.
//!
//! Every variant maps to exactly one HTTP status and a fixed `{"error": ...}`
//! body. Token and credential failures are deliberately coarse: the body
//! never says which check failed.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// JSON body returned for every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors surfaced by the auth service and the access guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The request body is not a well-formed credentials payload.
    MalformedRequest(String),
    /// Unknown user or wrong password.
    InvalidCredentials,
    /// Signing the token failed.
    TokenIssuanceFailure,
    /// No `Authorization` header on a protected route.
    MissingCredentials,
    /// `Authorization` header present but not of the form `Bearer <token>`.
    MalformedAuthHeader,
    /// The bearer token failed verification.
    Unauthorized,
    /// Registration for a username that already exists.
    DuplicateUser,
    /// The user store failed or timed out.
    StoreUnavailable,
}

impl AuthError {
    /// The HTTP status this error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials
            | Self::MissingCredentials
            | Self::MalformedAuthHeader
            | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::TokenIssuanceFailure => StatusCode::INTERNAL_SERVER_ERROR,
            Self::DuplicateUser => StatusCode::CONFLICT,
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRequest(reason) => write!(f, "{reason}"),
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::TokenIssuanceFailure => write!(f, "Could not generate token"),
            Self::MissingCredentials => write!(f, "Missing authorization header"),
            Self::MalformedAuthHeader => write!(f, "Malformed authorization header"),
            Self::Unauthorized => write!(f, "Invalid token"),
            Self::DuplicateUser => write!(f, "User already exists"),
            Self::StoreUnavailable => write!(f, "Credential store unavailable"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedRequest(rejection.body_text())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
