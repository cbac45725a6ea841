//! JWT issuance and verification.
//!
//! Tokens are HS256-signed and carry the username in `sub` plus `iat` and
//! `exp` timestamps in Unix seconds.
//!
//! # Pre-conditions
//! - The `JwtConfig` secret is non-empty (enforced by `JwtConfig::new_hs256`).
//!
//! # Post-conditions
//! - On success, verification returns the token's claims.
//! - On failure, the error tells signature problems, expiry and malformed
//!   input apart so callers can pick a response status.
//!
//! # Invariants
//! - Verification is stateless. Expiry is judged against the `now` passed
//!   in, never against a clock read inside this module.

use jsonwebtoken::{Algorithm, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::JwtConfig;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject claim containing the username.
    #[serde(default)]
    pub sub: String,
    /// Issue time, seconds since the Unix epoch.
    #[serde(default)]
    pub iat: u64,
    /// Expiry time, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// Error returned when issuing or verifying a JWT fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtError {
    /// The JWT signature does not match the configured secret.
    InvalidSignature,
    /// The JWT has expired.
    TokenExpired,
    /// The JWT is malformed, uses another algorithm, or cannot be parsed.
    MalformedToken,
    /// The 'sub' claim is missing or empty.
    MissingSubClaim,
    /// The 'exp' claim is missing.
    MissingExpClaim,
    /// Signing a new token failed.
    Signing(String),
}

impl JwtError {
    /// Whether the token was well formed but not acceptable.
    ///
    /// Signature mismatches and failed validity checks are authorization
    /// failures; everything else is a malformed request.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::InvalidSignature | Self::TokenExpired | Self::MissingSubClaim | Self::MissingExpClaim
        )
    }
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSignature => write!(f, "invalid JWT signature"),
            Self::TokenExpired => write!(f, "JWT has expired"),
            Self::MalformedToken => write!(f, "malformed JWT"),
            Self::MissingSubClaim => write!(f, "missing 'sub' claim in JWT"),
            Self::MissingExpClaim => write!(f, "missing 'exp' claim in JWT"),
            Self::Signing(reason) => write!(f, "failed to sign JWT: {reason}"),
        }
    }
}

impl std::error::Error for JwtError {}

/// Issues a signed token for `subject`, valid from `issued_at` for the
/// configured lifetime.
///
/// # Errors
/// Returns `JwtError::Signing` if encoding fails.
pub fn issue_token(subject: &str, issued_at: u64, config: &JwtConfig) -> Result<String, JwtError> {
    let claims = Claims {
        sub: subject.to_string(),
        iat: issued_at,
        exp: Some(issued_at.saturating_add(config.token_ttl_secs())),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &config.encoding_key())
        .map_err(|e| JwtError::Signing(e.to_string()))
}

/// Verifies a token and returns its claims.
///
/// The token is expired once `now >= exp`.
///
/// # Errors
/// Returns `JwtError` if verification fails for any reason.
pub fn verify_token(token: &str, config: &JwtConfig, now: u64) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Claim checks happen below against the caller's clock.
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation.required_spec_claims.clear();

    let token_data =
        decode::<Claims>(token, &config.decoding_key(), &validation).map_err(map_jwt_error)?;
    let claims = token_data.claims;

    let exp = claims.exp.ok_or(JwtError::MissingExpClaim)?;
    if now >= exp {
        return Err(JwtError::TokenExpired);
    }
    if claims.sub.is_empty() {
        return Err(JwtError::MissingSubClaim);
    }

    Ok(claims)
}

/// Maps jsonwebtoken errors to our JwtError type.
fn map_jwt_error(error: jsonwebtoken::errors::Error) -> JwtError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::MissingRequiredClaim(claim) if claim == "exp" => JwtError::MissingExpClaim,
        ErrorKind::MissingRequiredClaim(_) => JwtError::MissingSubClaim,
        _ => JwtError::MalformedToken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::EncodingKey;

    const SECRET: &[u8] = b"test-secret-key-that-is-long-enough";
    const NOW: u64 = 1_700_000_000;

    fn config() -> JwtConfig {
        JwtConfig::new_hs256(SECRET.to_vec(), 3600).unwrap()
    }

    fn encode_with(header: &Header, claims: &Claims, secret: &[u8]) -> String {
        encode(header, claims, &EncodingKey::from_secret(secret))
            .expect("failed to create test token")
    }

    #[test]
    fn test_issue_then_verify() {
        let token = issue_token("alice", NOW, &config()).unwrap();
        let claims = verify_token(&token, &config(), NOW).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iat, NOW);
        assert_eq!(claims.exp, Some(NOW + 3600));
    }

    #[test]
    fn test_verify_invalid_signature() {
        let wrong = JwtConfig::new_hs256(b"wrong-secret-key-that-is-different".to_vec(), 3600)
            .unwrap();
        let token = issue_token("alice", NOW, &wrong).unwrap();

        let result = verify_token(&token, &config(), NOW);
        assert_eq!(result, Err(JwtError::InvalidSignature));
        assert!(JwtError::InvalidSignature.is_unauthorized());
    }

    #[test]
    fn test_verify_expired_token() {
        let token = issue_token("alice", NOW, &config()).unwrap();

        assert!(verify_token(&token, &config(), NOW + 3599).is_ok());
        assert_eq!(
            verify_token(&token, &config(), NOW + 3600),
            Err(JwtError::TokenExpired)
        );
        assert_eq!(
            verify_token(&token, &config(), NOW + 10_000),
            Err(JwtError::TokenExpired)
        );
    }

    #[test]
    fn test_verify_malformed_token() {
        let result = verify_token("not-a-valid-jwt", &config(), NOW);
        assert_eq!(result, Err(JwtError::MalformedToken));
        assert!(!JwtError::MalformedToken.is_unauthorized());
    }

    #[test]
    fn test_verify_empty_token() {
        assert_eq!(verify_token("", &config(), NOW), Err(JwtError::MalformedToken));
    }

    #[test]
    fn test_verify_wrong_algorithm() {
        let claims = Claims {
            sub: "alice".to_string(),
            iat: NOW,
            exp: Some(NOW + 60),
        };
        let token = encode_with(&Header::new(Algorithm::HS384), &claims, SECRET);

        assert_eq!(
            verify_token(&token, &config(), NOW),
            Err(JwtError::MalformedToken)
        );
    }

    #[test]
    fn test_verify_missing_exp() {
        let claims = Claims {
            sub: "alice".to_string(),
            iat: NOW,
            exp: None,
        };
        let token = encode_with(&Header::new(Algorithm::HS256), &claims, SECRET);

        assert_eq!(
            verify_token(&token, &config(), NOW),
            Err(JwtError::MissingExpClaim)
        );
    }

    #[test]
    fn test_verify_empty_sub_claim() {
        let token = issue_token("", NOW, &config()).unwrap();
        assert_eq!(
            verify_token(&token, &config(), NOW),
            Err(JwtError::MissingSubClaim)
        );
    }

    #[test]
    fn test_verify_token_with_different_users() {
        let token1 = issue_token("alice", NOW, &config()).unwrap();
        let token2 = issue_token("bob", NOW, &config()).unwrap();

        assert_eq!(verify_token(&token1, &config(), NOW).unwrap().sub, "alice");
        assert_eq!(verify_token(&token2, &config(), NOW).unwrap().sub, "bob");
    }

    #[test]
    fn test_jwt_error_display() {
        assert_eq!(
            JwtError::InvalidSignature.to_string(),
            "invalid JWT signature"
        );
        assert_eq!(JwtError::TokenExpired.to_string(), "JWT has expired");
        assert_eq!(JwtError::MalformedToken.to_string(), "malformed JWT");
        assert_eq!(
            JwtError::MissingSubClaim.to_string(),
            "missing 'sub' claim in JWT"
        );
        assert_eq!(
            JwtError::MissingExpClaim.to_string(),
            "missing 'exp' claim in JWT"
        );
        assert_eq!(
            JwtError::Signing("boom".to_string()).to_string(),
            "failed to sign JWT: boom"
        );
    }
}
