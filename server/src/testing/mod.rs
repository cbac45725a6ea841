use std::sync::Arc;

use argon2::Params;

use crate::auth::{AuthGate, CredentialStore, DEFAULT_TOKEN_TTL_SECS, JwtConfig};
use crate::time::TimeSource;

/// Signing secret shared by every test gate.
pub const TEST_SECRET: &[u8] = b"test-secret-key-that-is-long-enough";

/// Create a credential store with the cheapest Argon2id parameters.
///
/// Production cost parameters make each hash take tens of milliseconds,
/// which adds up quickly across a test suite.
pub fn fast_credential_store() -> CredentialStore {
    #[allow(clippy::expect_used)]
    let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None)
        .expect("minimum Argon2 parameters are valid");
    CredentialStore::with_params(params)
}

/// Create an auth gate signing with `TEST_SECRET` and the default lifetime.
pub fn test_gate(time_source: Arc<dyn TimeSource>) -> AuthGate {
    #[allow(clippy::expect_used)]
    let jwt_config = JwtConfig::new_hs256(TEST_SECRET.to_vec(), DEFAULT_TOKEN_TTL_SECS)
        .expect("test secret is non-empty");
    AuthGate::new(fast_credential_store(), jwt_config, time_source)
}
