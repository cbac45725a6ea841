//! Server configuration module.
//!
//! This module provides configuration loading for the item server from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `ITEMSERVER_JWT_SECRET`: HS256 signing secret (required unless the file form is set)
//! - `ITEMSERVER_JWT_SECRET_FILE`: Path to a file holding the signing secret; wins over `ITEMSERVER_JWT_SECRET`
//! - `ITEMSERVER_LISTEN_PORT`: Port to listen on (default: `8080`)
//! - `ITEMSERVER_TOKEN_TTL_SECS`: Session token lifetime in seconds (default: `3600`)
//!
//! # Invariants
//!
//! - `jwt_secret` is never empty
//! - `listen_port` is always a valid port number (1-65535)
//! - `token_ttl_secs` is at least 1

use std::path::Path;

use crate::auth::{DEFAULT_TOKEN_TTL_SECS, JwtConfig, JwtConfigError};

const JWT_SECRET_VAR: &str = "ITEMSERVER_JWT_SECRET";
const JWT_SECRET_FILE_VAR: &str = "ITEMSERVER_JWT_SECRET_FILE";
const LISTEN_PORT_VAR: &str = "ITEMSERVER_LISTEN_PORT";
const TOKEN_TTL_VAR: &str = "ITEMSERVER_TOKEN_TTL_SECS";

/// Server configuration.
///
/// # Post-conditions
///
/// When constructed via `from_env()` or `from_lookup()`:
/// - `jwt_secret` is non-empty
/// - `listen_port` is in the valid range (1-65535)
#[derive(Clone)]
pub struct ServerConfig {
    /// Shared secret used to sign and verify session tokens.
    pub jwt_secret: Vec<u8>,
    /// Port to listen on for HTTP connections.
    pub listen_port: u16,
    /// Lifetime of issued session tokens, in seconds.
    pub token_ttl_secs: u64,
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
    /// Default session token lifetime.
    pub const DEFAULT_TOKEN_TTL_SECS: u64 = DEFAULT_TOKEN_TTL_SECS;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Neither `ITEMSERVER_JWT_SECRET_FILE` nor `ITEMSERVER_JWT_SECRET` yields a non-empty secret
    /// - `ITEMSERVER_LISTEN_PORT` is set but not a valid port number
    /// - `ITEMSERVER_TOKEN_TTL_SECS` is set but not a positive integer
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `from_env` is this with `std::env::var`; tests pass a map instead of
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = Self::load_jwt_secret(&lookup)?;
        let listen_port = Self::load_listen_port(&lookup)?;
        let token_ttl_secs = Self::load_token_ttl(&lookup)?;

        Ok(Self {
            jwt_secret,
            listen_port,
            token_ttl_secs,
        })
    }

    /// Build the token signing configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty or the lifetime is zero.
    pub fn jwt_config(&self) -> Result<JwtConfig, JwtConfigError> {
        JwtConfig::new_hs256(self.jwt_secret.clone(), self.token_ttl_secs)
    }

    /// Load the signing secret, preferring the file form.
    fn load_jwt_secret<F>(lookup: &F) -> Result<Vec<u8>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (name, secret) = if let Some(path) = lookup(JWT_SECRET_FILE_VAR) {
            (JWT_SECRET_FILE_VAR, Self::read_secret_file(Path::new(&path))?)
        } else if let Some(secret) = lookup(JWT_SECRET_VAR) {
            (JWT_SECRET_VAR, secret)
        } else {
            return Err(ConfigError::MissingEnvVar(JWT_SECRET_VAR.to_string()));
        };

        if secret.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: name.to_string(),
                message: "secret must not be empty".to_string(),
            });
        }

        Ok(secret.into_bytes())
    }

    /// Read a secret file, dropping trailing line breaks.
    fn read_secret_file(path: &Path) -> Result<String, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidValue {
            name: JWT_SECRET_FILE_VAR.to_string(),
            message: format!("cannot read '{}': {e}", path.display()),
        })?;
        Ok(contents.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Load the listen port.
    ///
    /// Returns the default if not set.
    fn load_listen_port<F>(lookup: &F) -> Result<u16, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(value) = lookup(LISTEN_PORT_VAR) else {
            return Ok(Self::DEFAULT_PORT);
        };
        match value.parse::<u16>() {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(ConfigError::InvalidValue {
                name: LISTEN_PORT_VAR.to_string(),
                message: format!("'{value}' is not a valid port number (must be 1-65535)"),
            }),
        }
    }

    /// Load the token lifetime.
    ///
    /// Returns the default if not set.
    fn load_token_ttl<F>(lookup: &F) -> Result<u64, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(value) = lookup(TOKEN_TTL_VAR) else {
            return Ok(Self::DEFAULT_TOKEN_TTL_SECS);
        };
        match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => Err(ConfigError::InvalidValue {
                name: TOKEN_TTL_VAR.to_string(),
                message: format!("'{value}' is not a positive number of seconds"),
            }),
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("jwt_secret", &"<redacted>")
            .field("listen_port", &self.listen_port)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_values() {
        assert_eq!(ServerConfig::DEFAULT_PORT, 8080);
        assert_eq!(ServerConfig::DEFAULT_TOKEN_TTL_SECS, 3600);
    }

    #[test]
    fn test_secret_with_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[(JWT_SECRET_VAR, "s3cret")])).unwrap();

        assert_eq!(config.jwt_secret, b"s3cret");
        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.token_ttl_secs, 3600);
        assert!(config.jwt_config().is_ok());
    }

    #[test]
    fn test_missing_secret() {
        let result = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(
            result.err(),
            Some(ConfigError::MissingEnvVar(JWT_SECRET_VAR.to_string()))
        );
    }

    #[test]
    fn test_empty_secret() {
        let result = ServerConfig::from_lookup(lookup(&[(JWT_SECRET_VAR, "")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref name, .. }) if name == JWT_SECRET_VAR
        ));
    }

    #[test]
    fn test_secret_file_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "from-file").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = ServerConfig::from_lookup(lookup(&[
            (JWT_SECRET_VAR, "from-env"),
            (JWT_SECRET_FILE_VAR, path.as_str()),
        ]))
        .unwrap();

        assert_eq!(config.jwt_secret, b"from-file");
    }

    #[test]
    fn test_secret_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").to_string_lossy().to_string();

        let result = ServerConfig::from_lookup(lookup(&[(JWT_SECRET_FILE_VAR, path.as_str())]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref name, .. }) if name == JWT_SECRET_FILE_VAR
        ));
    }

    #[test]
    fn test_custom_port_and_ttl() {
        let config = ServerConfig::from_lookup(lookup(&[
            (JWT_SECRET_VAR, "s"),
            (LISTEN_PORT_VAR, "9090"),
            (TOKEN_TTL_VAR, "60"),
        ]))
        .unwrap();

        assert_eq!(config.listen_port, 9090);
        assert_eq!(config.token_ttl_secs, 60);
    }

    #[test]
    fn test_invalid_port() {
        for value in ["0", "70000", "http"] {
            let result =
                ServerConfig::from_lookup(lookup(&[(JWT_SECRET_VAR, "s"), (LISTEN_PORT_VAR, value)]));
            assert!(
                matches!(result, Err(ConfigError::InvalidValue { ref name, .. }) if name == LISTEN_PORT_VAR),
                "port {value} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_ttl() {
        let result =
            ServerConfig::from_lookup(lookup(&[(JWT_SECRET_VAR, "s"), (TOKEN_TTL_VAR, "0")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref name, .. }) if name == TOKEN_TTL_VAR
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ServerConfig::from_lookup(lookup(&[(JWT_SECRET_VAR, "hidden-value")])).unwrap();
        assert!(!format!("{config:?}").contains("hidden-value"));
    }

    #[test]
    fn test_config_error_display_missing() {
        let error = ConfigError::MissingEnvVar("TEST_VAR".to_string());
        assert_eq!(
            error.to_string(),
            "missing required environment variable: TEST_VAR"
        );
    }

    #[test]
    fn test_config_error_display_invalid() {
        let error = ConfigError::InvalidValue {
            name: "TEST_VAR".to_string(),
            message: "bad value".to_string(),
        };
        assert_eq!(error.to_string(), "invalid value for TEST_VAR: bad value");
    }
}
