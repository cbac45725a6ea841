//! Token signing configuration.
//!
//! # Pre-conditions
//! - The HS256 secret comes from configuration, never from a literal in code.
//!
//! # Invariants
//! - The secret is never empty.
//! - The token lifetime is at least one second.
//! - The secret never appears in `Debug` output.

use jsonwebtoken::{DecodingKey, EncodingKey};

/// Default token lifetime: one hour.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Error returned when JWT configuration is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtConfigError {
    /// The HS256 secret is empty.
    EmptySecret,
    /// The token lifetime is zero.
    ZeroTtl,
}

impl std::fmt::Display for JwtConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "HS256 secret must not be empty"),
            Self::ZeroTtl => write!(f, "token lifetime must be at least one second"),
        }
    }
}

impl std::error::Error for JwtConfigError {}

/// HS256 signing and verification settings.
///
/// The same shared secret signs tokens at login and verifies them on every
/// protected request.
#[derive(Clone)]
pub struct JwtConfig {
    secret: Vec<u8>,
    token_ttl_secs: u64,
}

impl JwtConfig {
    /// Create a new HS256 configuration.
    ///
    /// # Errors
    /// Returns `JwtConfigError::EmptySecret` if the secret is empty and
    /// `JwtConfigError::ZeroTtl` if `token_ttl_secs` is zero.
    pub fn new_hs256(secret: Vec<u8>, token_ttl_secs: u64) -> Result<Self, JwtConfigError> {
        if secret.is_empty() {
            return Err(JwtConfigError::EmptySecret);
        }
        if token_ttl_secs == 0 {
            return Err(JwtConfigError::ZeroTtl);
        }
        Ok(Self {
            secret,
            token_ttl_secs,
        })
    }

    #[must_use]
    pub const fn token_ttl_secs(&self) -> u64 {
        self.token_ttl_secs
    }

    #[must_use]
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.secret)
    }

    #[must_use]
    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.secret)
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_hs256_valid() {
        let config = JwtConfig::new_hs256(b"my-secret-key".to_vec(), 60).unwrap();
        assert_eq!(config.token_ttl_secs(), 60);
    }

    #[test]
    fn test_new_hs256_empty_secret() {
        let result = JwtConfig::new_hs256(vec![], DEFAULT_TOKEN_TTL_SECS);
        assert!(matches!(result, Err(JwtConfigError::EmptySecret)));
    }

    #[test]
    fn test_new_hs256_zero_ttl() {
        let result = JwtConfig::new_hs256(b"secret".to_vec(), 0);
        assert!(matches!(result, Err(JwtConfigError::ZeroTtl)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig::new_hs256(b"super-secret-value".to_vec(), 60).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_jwt_config_error_display() {
        assert_eq!(
            JwtConfigError::EmptySecret.to_string(),
            "HS256 secret must not be empty"
        );
        assert_eq!(
            JwtConfigError::ZeroTtl.to_string(),
            "token lifetime must be at least one second"
        );
    }
}
