//! Signing configuration for gateway tokens.
//!
//! # Pre-conditions
//! - The HS256 secret must be a non-empty byte string.
//!
//! # Post-conditions
//! - `JwtConfig` instances are immutable once created.
//!
//! # Invariants
//! - The secret is never empty.
//! - The secret never appears in `Debug` output.

/// Error returned when JWT configuration is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtConfigError {
    /// The HS256 secret is empty.
    EmptySecret,
}

impl std::fmt::Display for JwtConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "HS256 secret must not be empty"),
        }
    }
}

impl std::error::Error for JwtConfigError {}

/// HMAC-SHA256 signing configuration.
///
/// The same secret is used for both issuance and verification, so a token
/// is only ever accepted by a codec built from an identical `JwtConfig`.
#[derive(Clone, PartialEq, Eq)]
pub struct JwtConfig {
    secret: Vec<u8>,
}

impl JwtConfig {
    /// Create a new HS256 JWT configuration.
    ///
    /// # Pre-conditions
    /// - `secret` must not be empty.
    ///
    /// # Errors
    /// Returns `JwtConfigError::EmptySecret` if the secret is empty.
    pub fn new_hs256(secret: impl Into<Vec<u8>>) -> Result<Self, JwtConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(JwtConfigError::EmptySecret);
        }
        Ok(Self { secret })
    }

    /// The raw shared secret.
    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &"HS256")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
