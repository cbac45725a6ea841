//! Common helpers for end-to-end tests.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use crate::http::{AppState, router};
use crate::storage::ItemStore;
use crate::testing::test_gate;
use crate::time::ManualTimeSource;

/// Clock reading every test server starts at.
pub const START_TIME: u64 = 1_700_000_000;

/// A router wired to a fresh store and gate, plus the runtime to drive it.
pub struct TestServer {
    router: Router,
    runtime: tokio::runtime::Runtime,
    clock: Arc<ManualTimeSource>,
}

/// A fully buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// The body as UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The body decoded as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON for `T`.
    #[must_use]
    pub fn json<T: DeserializeOwned>(&self) -> T {
        #[allow(clippy::expect_used)]
        serde_json::from_slice(&self.body).expect("response body should be valid JSON")
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}

impl TestServer {
    /// Create a new test server with an empty store and no users.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(ManualTimeSource::new(START_TIME));
        let state = AppState::new(ItemStore::new(), test_gate(clock.clone()));

        #[allow(clippy::expect_used)]
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");

        Self {
            router: router(state),
            runtime,
            clock,
        }
    }

    /// Send a request through the router and buffer the response.
    pub fn send(&self, request: Request<Body>) -> TestResponse {
        self.runtime.block_on(async {
            #[allow(clippy::expect_used)]
            let response = self
                .router
                .clone()
                .oneshot(request)
                .await
                .expect("router is infallible");
            let (parts, body) = response.into_parts();
            #[allow(clippy::expect_used)]
            let body = axum::body::to_bytes(body, usize::MAX)
                .await
                .expect("Failed to read response body");
            TestResponse {
                status: parts.status,
                headers: parts.headers,
                body,
            }
        })
    }

    /// Send all requests at once and return their statuses in request order.
    pub fn send_concurrently(&self, requests: Vec<Request<Body>>) -> Vec<StatusCode> {
        self.runtime.block_on(async {
            let handles: Vec<_> = requests
                .into_iter()
                .map(|request| tokio::spawn(self.router.clone().oneshot(request)))
                .collect();
            let mut statuses = Vec::with_capacity(handles.len());
            for handle in handles {
                #[allow(clippy::expect_used)]
                let response = handle
                    .await
                    .expect("request task panicked")
                    .expect("router is infallible");
                statuses.push(response.status());
            }
            statuses
        })
    }

    /// Move the server clock forward.
    pub fn advance_clock(&self, secs: u64) {
        self.clock.advance(secs);
    }

    pub fn register(&self, username: &str, password: &str) -> TestResponse {
        self.send(json_request(
            Method::POST,
            "/auth/register",
            None,
            &credentials_body(username, password),
        ))
    }

    pub fn login(&self, username: &str, password: &str) -> TestResponse {
        self.send(json_request(
            Method::POST,
            "/auth/login",
            None,
            &credentials_body(username, password),
        ))
    }

    /// Register a user, log in, and return the session token.
    ///
    /// # Panics
    ///
    /// Panics if registration or login does not succeed.
    #[must_use]
    pub fn token_for(&self, username: &str, password: &str) -> String {
        let registered = self.register(username, password);
        assert_eq!(registered.status, StatusCode::OK, "{}", registered.text());

        let response = self.login(username, password);
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());

        let body: serde_json::Value = response.json();
        #[allow(clippy::expect_used)]
        body["JWT"]
            .as_str()
            .expect("login response should carry a JWT")
            .to_string()
    }

    pub fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(empty_request(Method::GET, path, token))
    }

    pub fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(empty_request(Method::DELETE, path, token))
    }

    /// `POST /item` with a JSON body.
    pub fn add_item(&self, token: &str, info: &str) -> TestResponse {
        let body = serde_json::json!({ "Info": info }).to_string();
        self.send(json_request(Method::POST, "/item", Some(token), &body))
    }

    /// `POST /item` and return the assigned ID.
    ///
    /// # Panics
    ///
    /// Panics if the insert does not succeed.
    #[must_use]
    pub fn add_item_id(&self, token: &str, info: &str) -> u64 {
        let response = self.add_item(token, info);
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        let body: serde_json::Value = response.json();
        #[allow(clippy::expect_used)]
        body["Id"].as_u64().expect("insert response should carry an Id")
    }
}

// =============================================================================
// Request Builders
// =============================================================================

#[must_use]
pub fn credentials_body(username: &str, password: &str) -> String {
    serde_json::json!({ "username": username, "password": password }).to_string()
}

/// Build a request with no body.
#[must_use]
pub fn empty_request(method: Method, path: &str, token: Option<&str>) -> Request<Body> {
    request(method, path, token, None, Body::empty())
}

/// Build a request with a JSON body and content type.
#[must_use]
pub fn json_request(method: Method, path: &str, token: Option<&str>, body: &str) -> Request<Body> {
    request(
        method,
        path,
        token,
        Some("application/json"),
        Body::from(body.to_string()),
    )
}

/// Build an arbitrary request.
#[must_use]
pub fn request(
    method: Method,
    path: &str,
    token: Option<&str>,
    content_type: Option<&str>,
    body: Body,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, token);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    #[allow(clippy::expect_used)]
    builder.body(body).expect("Failed to build request")
}
