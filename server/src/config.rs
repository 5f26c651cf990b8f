//! Server configuration module.
//!
//! This module provides configuration loading for the gateway from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `GATEWAY_JWT_SECRET`: HS256 signing secret (required)
//! - `GATEWAY_LISTEN_PORT`: Port to listen on (default: `8080`)
//! - `GATEWAY_TOKEN_TTL_SECONDS`: Token lifetime in seconds (default: `86400`)
//! - `GATEWAY_STORE_TIMEOUT_MS`: Upper bound on a user store call (default: `2000`)
//! - `GATEWAY_ADMIN_USERNAME` / `GATEWAY_ADMIN_PASSWORD`: Optional identity
//!   registered at startup. Both or neither must be set.
//!
//! # Invariants
//!
//! - `jwt_secret` is never empty and never printed by `Debug`
//! - `token_validity` and `store_timeout` are never zero

use std::time::Duration;

use crate::auth::Credentials;

/// Server configuration.
///
/// # Post-conditions
///
/// - `listen_port` is always in the valid range (0-65535)
/// - `jwt_secret` is non-empty
#[derive(Clone)]
pub struct ServerConfig {
    /// Shared secret for signing and verifying tokens.
    pub jwt_secret: String,
    /// Port to listen on for HTTP connections.
    pub listen_port: u16,
    /// Lifetime of issued tokens.
    pub token_validity: Duration,
    /// Upper bound on a single user store call.
    pub store_timeout: Duration,
    /// Identity registered at startup, if configured.
    pub seed_user: Option<Credentials>,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is missing.
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnvVar(name) => {
                write!(f, "missing required environment variable: {name}")
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 8080;
    /// Default token lifetime in seconds.
    pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 24 * 60 * 60;
    /// Default user store timeout in milliseconds.
    pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `GATEWAY_JWT_SECRET` is not set or is empty
    /// - a numeric variable is set but not a valid positive number
    /// - only one of the admin seed variables is set
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = Self::load_jwt_secret(&lookup)?;
        let listen_port = Self::load_listen_port(&lookup)?;
        let token_validity = Duration::from_secs(Self::load_positive(
            &lookup,
            "GATEWAY_TOKEN_TTL_SECONDS",
            Self::DEFAULT_TOKEN_TTL_SECONDS,
        )?);
        let store_timeout = Duration::from_millis(Self::load_positive(
            &lookup,
            "GATEWAY_STORE_TIMEOUT_MS",
            Self::DEFAULT_STORE_TIMEOUT_MS,
        )?);
        let seed_user = Self::load_seed_user(&lookup)?;

        Ok(Self {
            jwt_secret,
            listen_port,
            token_validity,
            store_timeout,
            seed_user,
        })
    }

    /// Load the signing secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is not set or is empty.
    fn load_jwt_secret<F>(lookup: &F) -> Result<String, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("GATEWAY_JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("GATEWAY_JWT_SECRET".to_string()))?;

        if secret.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "GATEWAY_JWT_SECRET".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(secret)
    }

    /// Load the listen port.
    ///
    /// Returns the default if not set.
    fn load_listen_port<F>(lookup: &F) -> Result<u16, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("GATEWAY_LISTEN_PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "GATEWAY_LISTEN_PORT".to_string(),
                message: format!("'{value}' is not a valid port number (must be 0-65535)"),
            }),
            None => Ok(Self::DEFAULT_PORT),
        }
    }

    fn load_positive<F>(lookup: &F, name: &str, default: u64) -> Result<u64, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(value) = lookup(name) else {
            return Ok(default);
        };
        match value.parse::<u64>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(ConfigError::InvalidValue {
                name: name.to_string(),
                message: format!("'{value}' is not a positive integer"),
            }),
        }
    }

    fn load_seed_user<F>(lookup: &F) -> Result<Option<Credentials>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match (
            lookup("GATEWAY_ADMIN_USERNAME"),
            lookup("GATEWAY_ADMIN_PASSWORD"),
        ) {
            (None, None) => Ok(None),
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok(Some(Credentials::new(username, password)))
            }
            (Some(_), Some(_)) => Err(ConfigError::InvalidValue {
                name: "GATEWAY_ADMIN_USERNAME".to_string(),
                message: "username and password must not be empty".to_string(),
            }),
            (Some(_), None) => Err(ConfigError::MissingEnvVar(
                "GATEWAY_ADMIN_PASSWORD".to_string(),
            )),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar(
                "GATEWAY_ADMIN_USERNAME".to_string(),
            )),
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("listen_port", &self.listen_port)
            .field("token_validity", &self.token_validity)
            .field("store_timeout", &self.store_timeout)
            .field("seed_user", &self.seed_user)
            .finish()
    }
}
