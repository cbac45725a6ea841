//! The authentication gate: registration, login and token authorization.
//!
//! Sessions are stateless. A token stays valid until its `exp` passes;
//! there is no revocation.

use std::sync::Arc;

use super::credentials::{CredentialError, CredentialStore};
use super::jwt::{self, JwtError};
use super::JwtConfig;
use crate::time::TimeSource;

/// Errors produced by the auth gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Registration with a username that is already taken.
    UsernameTaken(String),
    /// Registration with an empty username.
    InvalidUsername,
    /// Unknown username or wrong password.
    LoginFailed,
    /// No token was presented.
    MissingToken,
    /// The token was parsed but rejected (bad signature, expired).
    Unauthorized(JwtError),
    /// The token could not be parsed.
    MalformedToken(JwtError),
    /// Hashing, signing or locking failed.
    Internal(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UsernameTaken(username) => write!(f, "username already taken: {username}"),
            Self::InvalidUsername => write!(f, "username must not be empty"),
            Self::LoginFailed => write!(f, "login failed"),
            Self::MissingToken => write!(f, "no token presented"),
            Self::Unauthorized(e) => write!(f, "unauthorized: {e}"),
            Self::MalformedToken(e) => write!(f, "bad token: {e}"),
            Self::Internal(reason) => write!(f, "internal error: {reason}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<CredentialError> for AuthError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::AlreadyExists(username) => Self::UsernameTaken(username),
            CredentialError::EmptyUsername => Self::InvalidUsername,
            CredentialError::Hashing(_) | CredentialError::LockPoisoned => {
                Self::Internal(e.to_string())
            }
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::Signing(_) => Self::Internal(e.to_string()),
            e if e.is_unauthorized() => Self::Unauthorized(e),
            e => Self::MalformedToken(e),
        }
    }
}

/// The principal a request was authorized as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

pub struct AuthGate {
    credentials: CredentialStore,
    jwt_config: JwtConfig,
    time_source: Arc<dyn TimeSource>,
}

impl AuthGate {
    #[must_use]
    pub fn new(
        credentials: CredentialStore,
        jwt_config: JwtConfig,
        time_source: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            credentials,
            jwt_config,
            time_source,
        }
    }

    /// Register a username and password.
    ///
    /// Fails with `UsernameTaken` if the name is already registered, leaving
    /// the existing entry untouched.
    pub fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.credentials.register(username, password)?;
        tracing::info!("user '{username}' registered");
        Ok(())
    }

    /// Check credentials and issue a session token.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if !self.credentials.verify(username, password)? {
            tracing::debug!("login rejected for '{username}'");
            return Err(AuthError::LoginFailed);
        }

        let token = jwt::issue_token(username, self.time_source.now_secs(), &self.jwt_config)?;
        tracing::info!("user '{username}' logged in");
        Ok(token)
    }

    /// Validate a bearer token and return the principal it names.
    pub fn authorize(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let claims = jwt::verify_token(token, &self.jwt_config, self.time_source.now_secs())
            .inspect_err(|e| tracing::debug!("token rejected: {e}"))?;

        Ok(AuthenticatedUser {
            username: claims.sub,
        })
    }

    #[cfg(test)]
    pub(crate) const fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TEST_SECRET, test_gate};
    use crate::time::ManualTimeSource;

    const START: u64 = 1_700_000_000;

    fn gate() -> (AuthGate, Arc<ManualTimeSource>) {
        let clock = Arc::new(ManualTimeSource::new(START));
        (test_gate(clock.clone()), clock)
    }

    #[test]
    fn test_register_twice_fails() {
        let (gate, _) = gate();
        gate.register("alice", "pw").unwrap();

        assert_eq!(
            gate.register("alice", "other"),
            Err(AuthError::UsernameTaken("alice".to_string()))
        );
        // The original password still works
        assert!(gate.login("alice", "pw").is_ok());
    }

    #[test]
    fn test_login_issues_token_for_subject() {
        let (gate, _) = gate();
        gate.register("alice", "pw").unwrap();

        let token = gate.login("alice", "pw").unwrap();
        let claims = jwt::verify_token(&token, gate.jwt_config(), START).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iat, START);
        assert_eq!(claims.exp, Some(START + 3600));
    }

    #[test]
    fn test_login_wrong_password() {
        let (gate, _) = gate();
        gate.register("alice", "pw").unwrap();

        assert_eq!(gate.login("alice", "nope"), Err(AuthError::LoginFailed));
    }

    #[test]
    fn test_login_unknown_user() {
        let (gate, _) = gate();
        assert_eq!(gate.login("ghost", "pw"), Err(AuthError::LoginFailed));
    }

    #[test]
    fn test_authorize_valid_token() {
        let (gate, _) = gate();
        gate.register("alice", "pw").unwrap();
        let token = gate.login("alice", "pw").unwrap();

        let user = gate.authorize(&token).unwrap();
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_authorize_expired_token() {
        let (gate, clock) = gate();
        gate.register("alice", "pw").unwrap();
        let token = gate.login("alice", "pw").unwrap();

        clock.advance(3600);

        assert_eq!(
            gate.authorize(&token),
            Err(AuthError::Unauthorized(JwtError::TokenExpired))
        );
    }

    #[test]
    fn test_authorize_foreign_signature() {
        let (gate, _) = gate();
        let foreign = JwtConfig::new_hs256(b"some-other-secret".to_vec(), 3600).unwrap();
        let token = jwt::issue_token("mallory", START, &foreign).unwrap();

        assert_eq!(
            gate.authorize(&token),
            Err(AuthError::Unauthorized(JwtError::InvalidSignature))
        );
    }

    #[test]
    fn test_authorize_garbage() {
        let (gate, _) = gate();
        assert_eq!(
            gate.authorize("garbage"),
            Err(AuthError::MalformedToken(JwtError::MalformedToken))
        );
    }

    #[test]
    fn test_authorize_empty_token() {
        let (gate, _) = gate();
        assert_eq!(gate.authorize(""), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_token_from_shared_secret_is_accepted() {
        let (gate, _) = gate();
        let config = JwtConfig::new_hs256(TEST_SECRET.to_vec(), 60).unwrap();
        // No registration needed: tokens are stateless
        let token = jwt::issue_token("bob", START, &config).unwrap();

        assert_eq!(gate.authorize(&token).unwrap().username, "bob");
    }

    #[test]
    fn test_auth_error_from_credential_error() {
        assert_eq!(
            AuthError::from(CredentialError::EmptyUsername),
            AuthError::InvalidUsername
        );
        assert!(matches!(
            AuthError::from(CredentialError::LockPoisoned),
            AuthError::Internal(_)
        ));
    }
}
