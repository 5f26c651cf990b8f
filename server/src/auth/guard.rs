//! Access guard for protected routes.
//!
//! Extracts `Authorization: Bearer <token>`, verifies the token and either
//! lets the request through with its `Claims` in the request extensions or
//! rejects it with a 401. Handlers read the claims via `AuthenticatedUser`.
//!
//! # Invariants
//! - The downstream handler is never invoked for a rejected request.
//! - All token verification failures produce the same `Unauthorized` error.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

use super::error::AuthError;
use super::jwt::{Claims, TokenCodec};
use crate::routes::AppState;

/// The exact scheme prefix expected in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Extracts the token from a `Bearer <token>` header value.
///
/// # Errors
/// - `MissingCredentials` if the header is absent or empty.
/// - `MalformedAuthHeader` if it is not visible ASCII, lacks the `Bearer `
///   prefix, or carries an empty token.
pub fn extract_bearer_token(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingCredentials),
    };

    let value = header.to_str().map_err(|_| AuthError::MalformedAuthHeader)?;
    match value.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedAuthHeader),
    }
}

/// Runs the full guard decision for one request's headers.
///
/// # Errors
/// Returns the `AuthError` the request should be rejected with.
pub fn authorize(headers: &HeaderMap, codec: &TokenCodec) -> Result<Claims, AuthError> {
    let token = extract_bearer_token(headers.get(AUTHORIZATION))?;
    codec.verify(token).map_err(|e| {
        tracing::debug!("rejected bearer token: {e}");
        AuthError::Unauthorized
    })
}

/// Middleware applied to every protected route.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = authorize(request.headers(), state.auth.codec()).inspect_err(|e| {
        tracing::debug!("denied {} {}: {e}", request.method(), request.uri().path());
    })?;

    tracing::debug!("authenticated request from '{}'", claims.username);
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Claims of the caller, as attached by `require_bearer_token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Self)
            .ok_or(AuthError::Unauthorized)
    }
}
