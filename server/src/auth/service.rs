//! Login and registration.
//!
//! # Pre-conditions
//! - Request bodies have already been parsed into `Credentials`.
//!
//! # Post-conditions
//! - `login` returns a token only for credentials the verifier accepts.
//! - `register` never returns a token.
//!
//! # Invariants
//! - Unknown users and wrong passwords produce the same error.
//! - Every user store call is bounded by `store_timeout`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::credentials::{CredentialVerifier, Credentials, UserStore, UserStoreError};
use super::error::AuthError;
use super::jwt::TokenCodec;

/// Default upper bound on a single user store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// Acknowledgment returned by a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationAck {
    pub message: String,
}

/// Token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginToken {
    pub token: String,
}

/// Orchestrates credential checks and token issuance.
pub struct AuthService {
    codec: TokenCodec,
    verifier: Arc<dyn CredentialVerifier>,
    store: Arc<dyn UserStore>,
    store_timeout: Duration,
}

impl AuthService {
    #[must_use]
    pub fn new(
        codec: TokenCodec,
        verifier: Arc<dyn CredentialVerifier>,
        store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            codec,
            verifier,
            store,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Build a service whose verifier and store are the same backend.
    #[must_use]
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected for shared state
    pub fn from_store<S>(codec: TokenCodec, store: Arc<S>) -> Self
    where
        S: CredentialVerifier + UserStore + 'static,
    {
        let verifier: Arc<dyn CredentialVerifier> = Arc::<S>::clone(&store);
        Self::new(codec, verifier, store)
    }

    #[must_use]
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// The codec used to issue and verify tokens.
    #[must_use]
    pub const fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Creates a new identity.
    ///
    /// # Errors
    /// - `MalformedRequest` if the username or password is empty.
    /// - `DuplicateUser` if the username is taken.
    /// - `StoreUnavailable` if the store fails or times out.
    pub async fn register(&self, credentials: &Credentials) -> Result<RegistrationAck, AuthError> {
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(AuthError::MalformedRequest(
                "username and password must not be empty".to_string(),
            ));
        }

        match self
            .bounded(self.store.create(&credentials.username, &credentials.password))
            .await
        {
            Ok(()) => {
                tracing::info!("registered user '{}'", credentials.username);
                Ok(RegistrationAck {
                    message: "User registered".to_string(),
                })
            }
            Err(UserStoreError::DuplicateUser(_)) => {
                tracing::info!(
                    "registration rejected, user '{}' already exists",
                    credentials.username
                );
                Err(AuthError::DuplicateUser)
            }
            Err(UserStoreError::Unavailable(reason)) => {
                tracing::error!("user store failed during registration: {reason}");
                Err(AuthError::StoreUnavailable)
            }
        }
    }

    /// Verifies credentials and issues a token.
    ///
    /// # Errors
    /// - `InvalidCredentials` if the verifier rejects the pair.
    /// - `StoreUnavailable` if the verifier's store fails or times out.
    /// - `TokenIssuanceFailure` if signing fails.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginToken, AuthError> {
        let verified = self
            .bounded(
                self.verifier
                    .verify(&credentials.username, &credentials.password),
            )
            .await
            .map_err(|e| {
                tracing::error!("user store failed during login: {e}");
                AuthError::StoreUnavailable
            })?;

        if !verified {
            tracing::warn!("failed login for user '{}'", credentials.username);
            return Err(AuthError::InvalidCredentials);
        }

        let (token, claims) = self.codec.issue_for(&credentials.username).map_err(|e| {
            tracing::error!("could not issue token: {e}");
            AuthError::TokenIssuanceFailure
        })?;

        tracing::info!(
            "issued token for user '{}' expiring at {}",
            claims.username,
            claims.exp
        );
        Ok(LoginToken { token })
    }

    /// Runs a store call, converting an elapsed timeout into `Unavailable`.
    async fn bounded<T, F>(&self, call: F) -> Result<T, UserStoreError>
    where
        F: Future<Output = Result<T, UserStoreError>>,
    {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                UserStoreError::Unavailable(format!(
                    "no response within {}ms",
                    self.store_timeout.as_millis()
                ))
            })?
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("codec", &self.codec)
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}
