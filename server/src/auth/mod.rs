//! Authentication module.
//!
//! Registration and login against an in-memory credential store, plus
//! issuance and verification of HS256 session tokens.
//!
//! # Pre-conditions
//! - The signing secret is supplied through configuration.
//!
//! # Post-conditions
//! - Authentication configuration is immutable once loaded.
//!
//! # Invariants
//! - Passwords are only ever stored as Argon2id hashes.
//! - No session state is kept server-side.

pub mod credentials;
pub mod gate;
pub mod jwt;
pub mod jwt_config;

pub use credentials::{CredentialError, CredentialStore};
pub use gate::{AuthError, AuthGate, AuthenticatedUser};
pub use jwt::{Claims, JwtError};
pub use jwt_config::{DEFAULT_TOKEN_TTL_SECS, JwtConfig, JwtConfigError};
