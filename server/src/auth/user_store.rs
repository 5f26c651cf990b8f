//! In-memory user store.
//!
//! Keeps bcrypt password hashes keyed by username. Suitable for a single
//! gateway process and for tests; a deployment with real persistence
//! implements `UserStore` and `CredentialVerifier` against its own backend.
//!
//! # Post-conditions
//! - Passwords are hashed before they are stored and never kept in plaintext.
//! - Hashing and verification run on the blocking thread pool.
//! - Every `verify` pays one bcrypt verification, whether or not the
//!   username exists.
//!
//! # Invariants
//! - A username maps to at most one hash.
//! - Entries are never partially constructed.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use tokio::sync::{OnceCell, RwLock};

use super::credentials::{CredentialVerifier, UserStore, UserStoreError};

/// Password behind the hash checked when a username is unknown.
const UNKNOWN_USER_PASSWORD: &str = "unknown-user-placeholder";

/// A user store that lives for the lifetime of the process.
///
/// # Thread Safety
///
/// Uses a `tokio::sync::RwLock`, allowing concurrent credential checks with
/// exclusive access only while inserting a new user.
pub struct InMemoryUserStore {
    /// Username to bcrypt hash.
    users: RwLock<HashMap<String, String>>,
    /// bcrypt work factor.
    cost: u32,
    /// Hash of `UNKNOWN_USER_PASSWORD` at `cost`, built on the first miss.
    unknown_user_hash: OnceCell<String>,
}

impl InMemoryUserStore {
    /// Create an empty store using bcrypt's default cost.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }

    /// Create an empty store with an explicit bcrypt cost.
    ///
    /// Tests use the cheapest cost bcrypt accepts to keep hashing fast.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            cost,
            unknown_user_hash: OnceCell::new(),
        }
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Whether `username` is registered.
    pub async fn contains(&self, username: &str) -> bool {
        self.users.read().await.contains_key(username)
    }

    async fn unknown_user_hash(&self) -> Result<String, UserStoreError> {
        self.unknown_user_hash
            .get_or_try_init(|| hash_password(UNKNOWN_USER_PASSWORD, self.cost))
            .await
            .cloned()
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryUserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryUserStore")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

async fn hash_password(password: &str, cost: u32) -> Result<String, UserStoreError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| UserStoreError::Unavailable(format!("hashing task failed: {e}")))?
        .map_err(|e| UserStoreError::Unavailable(format!("failed to hash password: {e}")))
}

async fn verify_password(password: &str, hash: String) -> Result<bool, UserStoreError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| UserStoreError::Unavailable(format!("verification task failed: {e}")))?
        .map_err(|e| UserStoreError::Unavailable(format!("failed to verify password: {e}")))
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, username: &str, password: &str) -> Result<(), UserStoreError> {
        if self.contains(username).await {
            return Err(UserStoreError::DuplicateUser(username.to_string()));
        }

        // Hash outside the lock; the entry is re-checked before inserting.
        let hash = hash_password(password, self.cost).await?;

        let mut users = self.users.write().await;
        match users.entry(username.to_string()) {
            Entry::Occupied(_) => Err(UserStoreError::DuplicateUser(username.to_string())),
            Entry::Vacant(entry) => {
                entry.insert(hash);
                tracing::debug!("stored new user '{username}'");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl CredentialVerifier for InMemoryUserStore {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, UserStoreError> {
        let stored = self.users.read().await.get(username).cloned();
        let known = stored.is_some();
        let hash = match stored {
            Some(hash) => hash,
            None => self.unknown_user_hash().await?,
        };

        // Unknown users still pay a full verification at the same cost.
        let matched = verify_password(password, hash).await?;
        Ok(known && matched)
    }
}
