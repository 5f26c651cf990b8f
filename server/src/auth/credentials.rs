//! Credential types and the capabilities the gateway needs from a user store.
//!
//! The `AuthService` depends only on the `CredentialVerifier` and `UserStore`
//! traits, so swapping the static single-user check for a real store requires
//! no change to the service or the access guard.
//!
//! # Invariants
//! - `CredentialVerifier::verify` returns `Ok(false)` for both an unknown
//!   username and a wrong password; callers cannot tell the two apart.
//! - `Err` is reserved for failures of the backing store itself.

use async_trait::async_trait;
use serde::Deserialize;
use subtle::ConstantTimeEq;

/// A username/password pair submitted to `/login` or `/register`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Errors a user store may report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserStoreError {
    /// A user with this username already exists.
    DuplicateUser(String),
    /// The store could not complete the operation.
    Unavailable(String),
}

impl std::fmt::Display for UserStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateUser(username) => write!(f, "user already exists: {username}"),
            Self::Unavailable(reason) => write!(f, "user store unavailable: {reason}"),
        }
    }
}

impl std::error::Error for UserStoreError {}

/// Checks whether a username/password pair is a valid identity.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns `Ok(true)` only if `password` is correct for `username`.
    async fn verify(&self, username: &str, password: &str) -> Result<bool, UserStoreError>;
}

/// Creates identities.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Stores a new identity.
    ///
    /// # Errors
    /// Returns `UserStoreError::DuplicateUser` if `username` is taken.
    async fn create(&self, username: &str, password: &str) -> Result<(), UserStoreError>;
}

/// A verifier that accepts exactly one configured identity.
///
/// Comparison is constant-time over both fields.
#[derive(Clone)]
pub struct StaticCredentialVerifier {
    username: String,
    password: String,
}

impl StaticCredentialVerifier {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for StaticCredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentialVerifier")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, UserStoreError> {
        // Evaluate both comparisons so timing does not reveal which one failed.
        let username_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let password_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        Ok((username_ok & password_ok).into())
    }
}
