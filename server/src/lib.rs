// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
// Life of a request:
// 1. Request comes in, the access log middleware starts a timer
// 2. Protected routes: the Authorization header is verified by the auth gate,
//    and the authenticated user is attached to the request
// 3. The handler decodes the body and calls into the item store or the gate
// 4. Errors are converted to a status code and a plain text body
//
// System components:
//  - Item store (in-memory, lock-guarded)
//  - Auth gate (Argon2 credentials, HS256 session tokens)
//  - HTTP router and middleware

pub mod auth;
pub mod config;
pub mod http;
pub mod storage;
pub mod time;
pub mod types;

mod e2e_tests;
#[cfg(test)]
mod testing;

pub use auth::AuthGate;
pub use http::{AppState, router};
pub use storage::ItemStore;
