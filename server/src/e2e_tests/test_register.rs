//! Test user registration.

use axum::http::{Method, StatusCode};

use crate::e2e_tests::helpers::*;

#[test]
fn test_register_new_user() {
    let server = TestServer::new();

    let response = server.register("alice", "hunter2");

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_empty());
}

#[test]
fn test_register_duplicate_username() {
    let server = TestServer::new();
    assert_eq!(server.register("alice", "first").status, StatusCode::OK);

    let response = server.register("alice", "second");

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "username already taken");

    // The failed attempt must not have replaced the original password
    assert_eq!(server.login("alice", "first").status, StatusCode::OK);
    assert_eq!(server.login("alice", "second").status, StatusCode::BAD_REQUEST);
}

#[test]
fn test_register_malformed_body() {
    let server = TestServer::new();

    let response = server.send(json_request(Method::POST, "/auth/register", None, "{not json"));

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "bad credentials");
}

#[test]
fn test_register_missing_password_means_empty() {
    let server = TestServer::new();

    let response = server.send(json_request(
        Method::POST,
        "/auth/register",
        None,
        r#"{"username": "alice"}"#,
    ));

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(server.login("alice", "").status, StatusCode::OK);
    assert_eq!(server.login("alice", "pw").status, StatusCode::BAD_REQUEST);
}

#[test]
fn test_register_capitalised_keys() {
    let server = TestServer::new();
    let body = r#"{"Username": "bob", "Password": "x"}"#;

    let response = server.send(json_request(Method::POST, "/auth/register", None, body));
    assert_eq!(response.status, StatusCode::OK);

    let response = server.send(json_request(Method::POST, "/auth/login", None, body));
    assert_eq!(response.status, StatusCode::OK);
}

#[test]
fn test_register_same_name_concurrently() {
    let server = TestServer::new();
    let requests = (0..8)
        .map(|i| {
            json_request(
                Method::POST,
                "/auth/register",
                None,
                &credentials_body("alice", &format!("pw{i}")),
            )
        })
        .collect();

    let statuses = server.send_concurrently(requests);

    let accepted = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    assert_eq!(accepted, 1);
    assert!(
        statuses
            .iter()
            .all(|s| *s == StatusCode::OK || *s == StatusCode::BAD_REQUEST)
    );
}

#[test]
fn test_register_empty_username() {
    let server = TestServer::new();

    let response = server.register("", "pw");

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "bad credentials");
}

#[test]
fn test_register_without_content_type() {
    // Credentials are accepted regardless of the declared content type
    let server = TestServer::new();

    let response = server.send(request(
        Method::POST,
        "/auth/register",
        None,
        None,
        credentials_body("alice", "pw").into(),
    ));

    assert_eq!(response.status, StatusCode::OK);
}
