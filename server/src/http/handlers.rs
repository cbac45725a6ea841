//! Route handlers.
//!
//! Handlers decode the request, call into the auth gate or the item store,
//! and shape the response. They hold no locks across awaits.

use std::sync::Arc;

use axum::Extension;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Html;
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiError;
use crate::auth::{AuthError, AuthGate, AuthenticatedUser};
use crate::storage::StoreError;
use crate::types::{Item, ItemId};

/// Absent fields decode as empty strings; capitalised keys are accepted.
#[derive(Debug, Deserialize)]
struct CredentialsRequest {
    #[serde(default, alias = "Username")]
    username: String,
    #[serde(default, alias = "Password")]
    password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "JWT")]
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AddItemRequest {
    #[serde(rename = "Info", alias = "info", default)]
    info: String,
}

#[derive(Debug, Serialize)]
pub struct AddItemResponse {
    #[serde(rename = "Id")]
    pub id: ItemId,
}

fn parse_credentials(body: &[u8]) -> Result<CredentialsRequest, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("rejected credentials body: {e}");
        ApiError::BadRequest("bad credentials".to_string())
    })
}

fn parse_item_id(raw: &str) -> Result<ItemId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid item id: {raw}")))
}

/// Run an Argon2-bound gate call on the blocking pool.
async fn with_gate<T, F>(gate: &Arc<AuthGate>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&AuthGate) -> Result<T, AuthError> + Send + 'static,
{
    let gate = Arc::clone(gate);
    let result = tokio::task::spawn_blocking(move || f(&gate))
        .await
        .map_err(|e| ApiError::Internal(format!("auth task failed: {e}")))?;
    result.map_err(ApiError::from)
}

/// `POST /auth/register`
pub async fn register(State(state): State<AppState>, body: Bytes) -> Result<StatusCode, ApiError> {
    let CredentialsRequest { username, password } = parse_credentials(&body)?;
    with_gate(&state.gate, move |gate| gate.register(&username, &password)).await?;
    Ok(StatusCode::OK)
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoginResponse>, ApiError> {
    let CredentialsRequest { username, password } = parse_credentials(&body)?;
    let token = with_gate(&state.gate, move |gate| gate.login(&username, &password)).await?;
    Ok(Json(LoginResponse { token }))
}

/// `GET /welcome`
pub async fn welcome(Extension(user): Extension<AuthenticatedUser>) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Welcome</title></head>\n<body>\n<h1>Hello, {}!</h1>\n</body>\n</html>\n",
        escape_html(&user.username)
    ))
}

/// `GET /item`
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    Ok(Json(state.store.list_all()?))
}

/// `POST /item`
///
/// Only `application/json` bodies are accepted, and the body may carry no
/// field besides `Info`.
pub async fn add_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AddItemResponse>, ApiError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !is_json_content_type(content_type) {
        return Err(ApiError::UnsupportedMediaType(format!(
            "application/json expected got {content_type}"
        )));
    }

    let request: AddItemRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!("rejected item body: {e}");
        ApiError::BadRequest("failed to decode request".to_string())
    })?;

    let id = state.store.insert(request.info)?;
    Ok(Json(AddItemResponse { id }))
}

/// `DELETE /item`
pub async fn delete_all(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    state.store.delete_all()?;
    Ok("OK")
}

/// `GET /item/{id}`
pub async fn get_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_item_id(&raw_id)?;
    match state.store.get(id) {
        Ok(item) => Ok(Json(item)),
        Err(StoreError::NotFound(id)) => {
            Err(ApiError::BadRequest(format!("cannot find item {id}")))
        }
        Err(e) => Err(e.into()),
    }
}

/// `DELETE /item/{id}`
///
/// A failed delete answers with the error alone.
pub async fn delete_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<&'static str, ApiError> {
    let id = parse_item_id(&raw_id)?;
    state.store.delete(id)?;
    Ok("OK")
}

/// Compare the media type, ignoring parameters such as `charset`.
fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
