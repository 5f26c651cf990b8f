//! Authentication module.
//!
//! Token issuance and verification, credential checks, and the access guard
//! that protects routes behind a bearer token.
//!
//! # Pre-conditions
//! - The signing secret is supplied at construction, never read from globals.
//!
//! # Post-conditions
//! - Authentication configuration is immutable once loaded.
//!
//! # Invariants
//! - Issuance and verification share one `TokenCodec`.

pub mod credentials;
pub mod error;
pub mod guard;
pub mod jwt;
pub mod jwt_config;
pub mod service;
pub mod user_store;

pub use credentials::{
    CredentialVerifier, Credentials, StaticCredentialVerifier, UserStore, UserStoreError,
};
pub use error::{AuthError, ErrorBody};
pub use guard::{AuthenticatedUser, require_bearer_token};
pub use jwt::{Claims, DEFAULT_TOKEN_VALIDITY, JwtError, TokenCodec};
pub use jwt_config::{JwtConfig, JwtConfigError};
pub use service::{AuthService, LoginToken, RegistrationAck};
pub use user_store::InMemoryUserStore;
