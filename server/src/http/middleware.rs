//! Request middleware: access logging and bearer-token authorization.

use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use super::AppState;
use super::error::ApiError;
use crate::auth::AuthError;

/// Logs method, path, status and latency for every request.
///
/// Server errors are logged at WARN, everything else at DEBUG.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    if status.is_server_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), latency_ms, "request failed");
    } else {
        tracing::debug!(%method, %path, status = status.as_u16(), latency_ms, "request handled");
    }

    response
}

/// Rejects requests without a valid session token.
///
/// The token is read from the `Authorization` header, with or without a
/// `Bearer ` prefix. On success the `AuthenticatedUser` is stored as a
/// request extension for the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = match request.headers().get(AUTHORIZATION) {
        None => return Err(AuthError::MissingToken.into()),
        Some(value) => value
            .to_str()
            .map_err(|_| ApiError::BadRequest("bad token".to_string()))?,
    };
    let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();

    let user = state.gate.authorize(token)?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
