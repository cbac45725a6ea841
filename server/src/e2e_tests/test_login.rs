//! Test login and the tokens it issues.

use axum::http::{Method, StatusCode};

use crate::auth::{JwtConfig, jwt};
use crate::e2e_tests::helpers::*;
use crate::testing::TEST_SECRET;

#[test]
fn test_login_returns_token_for_user() {
    let server = TestServer::new();
    assert_eq!(server.register("alice", "hunter2").status, StatusCode::OK);

    let response = server.login("alice", "hunter2");

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type(), Some("application/json"));

    let body: serde_json::Value = response.json();
    let token = body["JWT"].as_str().unwrap();

    let config = JwtConfig::new_hs256(TEST_SECRET.to_vec(), 3600).unwrap();
    let claims = jwt::verify_token(token, &config, START_TIME).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.iat, START_TIME);
    assert_eq!(claims.exp, Some(START_TIME + 3600));
}

#[test]
fn test_login_wrong_password() {
    let server = TestServer::new();
    assert_eq!(server.register("alice", "hunter2").status, StatusCode::OK);

    let response = server.login("alice", "hunter3");

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "login failed");
}

#[test]
fn test_login_unknown_user() {
    let server = TestServer::new();

    let response = server.login("nobody", "pw");

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "login failed");
}

#[test]
fn test_login_malformed_body() {
    let server = TestServer::new();

    let response = server.send(json_request(Method::POST, "/auth/login", None, "[]"));

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "bad credentials");
}

#[test]
fn test_each_login_issues_a_working_token() {
    let server = TestServer::new();
    let first = server.token_for("alice", "pw");

    server.advance_clock(10);
    let response = server.login("alice", "pw");
    let body: serde_json::Value = response.json();
    let second = body["JWT"].as_str().unwrap().to_string();

    assert_ne!(first, second);
    assert_eq!(server.get("/item", Some(&first)).status, StatusCode::OK);
    assert_eq!(server.get("/item", Some(&second)).status, StatusCode::OK);
}
