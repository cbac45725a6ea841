//! Registered user credentials.
//!
//! Passwords are stored as Argon2id PHC strings with a random 16-byte salt.
//! Verification goes through `PasswordVerifier`, which compares the derived
//! hash in constant time.
//!
//! # Thread Safety
//!
//! The credential map sits behind a `RwLock`. Hashing runs outside the lock,
//! so a slow registration does not block logins.
//!
//! # Invariants
//!
//! - Usernames are unique and non-empty
//! - An entry is never updated or removed once registered

use std::collections::HashMap;
use std::sync::RwLock;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Errors that can occur when registering or checking credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The username is already registered.
    AlreadyExists(String),
    /// The username is empty.
    EmptyUsername,
    /// Producing the password hash failed.
    Hashing(String),
    /// A thread panicked while holding the credential lock.
    LockPoisoned,
}

impl std::fmt::Display for CredentialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyExists(username) => write!(f, "username already taken: {username}"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::Hashing(reason) => write!(f, "failed to hash password: {reason}"),
            Self::LockPoisoned => write!(f, "credential store lock poisoned"),
        }
    }
}

impl std::error::Error for CredentialError {}

/// Map of usernames to password hashes.
pub struct CredentialStore {
    hashes: RwLock<HashMap<String, String>>,
    argon2: Argon2<'static>,
}

impl CredentialStore {
    /// Create an empty store hashing with the default Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_argon2(Argon2::default())
    }

    /// Create an empty store with custom Argon2id cost parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        Self::with_argon2(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn with_argon2(argon2: Argon2<'static>) -> Self {
        Self {
            hashes: RwLock::new(HashMap::new()),
            argon2,
        }
    }

    fn contains(&self, username: &str) -> Result<bool, CredentialError> {
        Ok(self
            .hashes
            .read()
            .map_err(|_| CredentialError::LockPoisoned)?
            .contains_key(username))
    }

    /// Register a new user.
    ///
    /// # Post-conditions
    ///
    /// - On error the store is unchanged
    #[allow(clippy::significant_drop_tightening)] // The write lock must cover the check and the insert
    pub fn register(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        if username.is_empty() {
            return Err(CredentialError::EmptyUsername);
        }

        // Fast path: reject known usernames before paying for a hash
        if self.contains(username)? {
            return Err(CredentialError::AlreadyExists(username.to_string()));
        }

        let hash = self.hash_password(password)?;

        let mut hashes = self
            .hashes
            .write()
            .map_err(|_| CredentialError::LockPoisoned)?;

        // Double-check: another request may have registered the name while we hashed
        if hashes.contains_key(username) {
            return Err(CredentialError::AlreadyExists(username.to_string()));
        }
        hashes.insert(username.to_string(), hash);

        tracing::debug!("registered user '{username}'");
        Ok(())
    }

    /// Check a username and password pair.
    ///
    /// Returns `Ok(false)` for unknown users and wrong passwords alike.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        let stored = self
            .hashes
            .read()
            .map_err(|_| CredentialError::LockPoisoned)?
            .get(username)
            .cloned();

        let Some(stored) = stored else {
            return Ok(false);
        };

        let Ok(parsed) = PasswordHash::new(&stored) else {
            tracing::warn!("stored password hash for '{username}' is not a valid PHC string");
            return Ok(false);
        };

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> Result<usize, CredentialError> {
        Ok(self
            .hashes
            .read()
            .map_err(|_| CredentialError::LockPoisoned)?
            .len())
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> Result<bool, CredentialError> {
        Ok(self.len()? == 0)
    }

    fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        let salt_bytes: [u8; 16] = rand::random();
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    #[cfg(test)]
    pub(crate) fn stored_hash(&self, username: &str) -> Option<String> {
        self.hashes.read().ok()?.get(username).cloned()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fast_credential_store;

    #[test]
    fn test_register_and_verify() {
        let store = fast_credential_store();
        store.register("alice", "hunter2").unwrap();

        assert!(store.verify("alice", "hunter2").unwrap());
        assert!(!store.verify("alice", "wrong").unwrap());
    }

    #[test]
    fn test_verify_unknown_user() {
        let store = fast_credential_store();
        assert!(!store.verify("nobody", "anything").unwrap());
    }

    #[test]
    fn test_password_is_not_stored_in_plaintext() {
        let store = fast_credential_store();
        store.register("alice", "hunter2").unwrap();

        let hash = store.stored_hash("alice").unwrap();
        assert!(!hash.contains("hunter2"));
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let store = fast_credential_store();
        store.register("alice", "same").unwrap();
        store.register("bob", "same").unwrap();

        assert_ne!(store.stored_hash("alice"), store.stored_hash("bob"));
    }

    #[test]
    fn test_duplicate_registration_leaves_state_unchanged() {
        let store = fast_credential_store();
        store.register("alice", "first").unwrap();
        let before = store.stored_hash("alice");

        let result = store.register("alice", "second");

        assert_eq!(
            result,
            Err(CredentialError::AlreadyExists("alice".to_string()))
        );
        assert_eq!(store.stored_hash("alice"), before);
        assert_eq!(store.len().unwrap(), 1);
        assert!(store.verify("alice", "first").unwrap());
        assert!(!store.verify("alice", "second").unwrap());
    }

    #[test]
    fn test_empty_username_rejected() {
        let store = fast_credential_store();
        assert_eq!(
            store.register("", "pw"),
            Err(CredentialError::EmptyUsername)
        );
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_empty_password_allowed() {
        let store = fast_credential_store();
        store.register("alice", "").unwrap();

        assert!(store.verify("alice", "").unwrap());
        assert!(!store.verify("alice", "x").unwrap());
    }

    #[test]
    fn test_credential_error_display() {
        assert_eq!(
            CredentialError::AlreadyExists("bob".to_string()).to_string(),
            "username already taken: bob"
        );
        assert_eq!(
            CredentialError::EmptyUsername.to_string(),
            "username must not be empty"
        );
    }
}
