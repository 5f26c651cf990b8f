//! JWT issuance and verification.
//!
//! Provides the `TokenCodec`, which signs and verifies HS256 JSON Web Tokens
//! carrying a username and an absolute expiry.
//!
//! # Pre-conditions
//! - The codec is built from a valid `JwtConfig` (non-empty secret).
//!
//! # Post-conditions
//! - `issue` produces a compact `header.payload.signature` token.
//! - `verify` returns the embedded claims only if the signature matches and
//!   the token has not expired.
//!
//! # Invariants
//! - Issuance and verification use the same secret and algorithm.
//! - A token is expired from the second its `exp` is reached (no leeway).
//! - Verification is stateless and does not modify any external state.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::JwtConfig;
use crate::time::TimeSource;

/// Default lifetime of an issued token.
pub const DEFAULT_TOKEN_VALIDITY: Duration = Duration::from_secs(24 * 60 * 60);

/// Claims embedded in a gateway token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated username.
    pub username: String,
    /// Expiry as seconds since Unix epoch.
    pub exp: u64,
}

/// Error returned when issuing or verifying a JWT fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtError {
    /// The JWT signature is invalid.
    InvalidSignature,
    /// The JWT has expired.
    TokenExpired,
    /// The JWT is malformed or cannot be parsed.
    MalformedToken,
    /// The 'username' claim is empty.
    MissingUsername,
    /// The expiry would not fit in a Unix timestamp.
    ExpiryOverflow,
    /// The signing library rejected the claims or key.
    Signing(String),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSignature => write!(f, "invalid JWT signature"),
            Self::TokenExpired => write!(f, "JWT has expired"),
            Self::MalformedToken => write!(f, "malformed JWT"),
            Self::MissingUsername => write!(f, "missing 'username' claim in JWT"),
            Self::ExpiryOverflow => write!(f, "JWT expiry overflows"),
            Self::Signing(reason) => write!(f, "failed to sign JWT: {reason}"),
        }
    }
}

impl std::error::Error for JwtError {}

/// Signs and verifies gateway tokens.
///
/// Cheap to share behind an `Arc`; all fields are read-only after
/// construction.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
    time: Arc<dyn TimeSource>,
}

impl TokenCodec {
    /// Create a codec with the default 24 hour validity window.
    #[must_use]
    pub fn new(config: &JwtConfig, time: Arc<dyn TimeSource>) -> Self {
        Self::with_validity(config, DEFAULT_TOKEN_VALIDITY, time)
    }

    /// Create a codec whose tokens live for `validity`.
    #[must_use]
    pub fn with_validity(config: &JwtConfig, validity: Duration, time: Arc<dyn TimeSource>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret()),
            decoding_key: DecodingKey::from_secret(config.secret()),
            validity,
            time,
        }
    }

    /// How long issued tokens remain valid.
    #[must_use]
    pub const fn validity(&self) -> Duration {
        self.validity
    }

    /// Signs the given claims.
    ///
    /// # Errors
    /// Returns `JwtError::Signing` if the signing library fails.
    pub fn issue(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, &self.encoding_key).map_err(|e| JwtError::Signing(e.to_string()))
    }

    /// Builds claims for `username` expiring one validity window from now and
    /// signs them.
    ///
    /// # Post-conditions
    /// - `claims.exp == now + validity`.
    ///
    /// # Errors
    /// Returns `JwtError::ExpiryOverflow` if the expiry does not fit in a
    /// `u64`, or `JwtError::Signing` if signing fails.
    pub fn issue_for(&self, username: &str) -> Result<(String, Claims), JwtError> {
        let exp = self
            .time
            .now_secs()
            .checked_add(self.validity.as_secs())
            .ok_or(JwtError::ExpiryOverflow)?;
        let claims = Claims {
            username: username.to_string(),
            exp,
        };
        let token = self.issue(&claims)?;
        Ok((token, claims))
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    /// Returns `JwtError` if verification fails for any reason.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        // Expiry is checked below against our own time source, without leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(map_jwt_error)?
            .claims;

        if claims.username.is_empty() {
            return Err(JwtError::MissingUsername);
        }
        if self.time.now_secs() >= claims.exp {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &"HS256")
            .field("validity", &self.validity)
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

/// Maps jsonwebtoken errors to our JwtError type.
fn map_jwt_error(error: jsonwebtoken::errors::Error) -> JwtError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::MalformedToken,
    }
}
