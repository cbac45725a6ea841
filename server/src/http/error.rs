//! Conversion of domain errors into HTTP responses.
//!
//! Every failure ends at a handler boundary as a status code plus a plain
//! text body. Unknown items and taken usernames surface as 400, not as
//! distinct statuses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::auth::AuthError;
use crate::storage::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    UnsupportedMediaType(String),
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::UnsupportedMediaType(message)
            | Self::Internal(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Internal(detail) => {
                // Details stay in the log, clients get a generic message
                tracing::error!("internal error: {detail}");
                "internal error".to_string()
            }
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::UnsupportedMediaType(message) => message,
        };
        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Self::BadRequest(e.to_string()),
            StoreError::LockPoisoned => Self::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::UsernameTaken(_) => Self::BadRequest("username already taken".to_string()),
            AuthError::InvalidUsername => Self::BadRequest("bad credentials".to_string()),
            AuthError::LoginFailed => Self::BadRequest("login failed".to_string()),
            AuthError::MissingToken => Self::BadRequest("no jwt token".to_string()),
            AuthError::Unauthorized(_) => Self::Unauthorized("unauthorized".to_string()),
            AuthError::MalformedToken(_) => Self::BadRequest("bad token".to_string()),
            AuthError::Internal(detail) => Self::Internal(detail),
        }
    }
}
