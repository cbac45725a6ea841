//! Test request validation on `POST /item`.

use axum::body::Body;
use axum::http::{Method, StatusCode};

use crate::e2e_tests::helpers::*;

#[test]
fn test_wrong_content_type() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let response = server.send(request(
        Method::POST,
        "/item",
        Some(&token),
        Some("text/plain"),
        Body::from(r#"{"Info": "a"}"#),
    ));

    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(response.text(), "application/json expected got text/plain");
}

#[test]
fn test_missing_content_type() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let response = server.send(request(
        Method::POST,
        "/item",
        Some(&token),
        None,
        Body::from(r#"{"Info": "a"}"#),
    ));

    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(response.text(), "application/json expected got ");
}

#[test]
fn test_content_type_with_charset() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let response = server.send(request(
        Method::POST,
        "/item",
        Some(&token),
        Some("application/json; charset=utf-8"),
        Body::from(r#"{"Info": "a"}"#),
    ));

    assert_eq!(response.status, StatusCode::OK);
}

#[test]
fn test_unknown_field_rejected() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let response = server.send(json_request(
        Method::POST,
        "/item",
        Some(&token),
        r#"{"Info": "a", "Owner": "alice"}"#,
    ));

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "failed to decode request");

    // Nothing was stored
    assert_eq!(server.get("/item", Some(&token)).text(), "[]");
}

#[test]
fn test_malformed_json_rejected() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let response = server.send(json_request(Method::POST, "/item", Some(&token), "{\"Info\":"));

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[test]
fn test_response_carries_id() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let response = server.add_item(&token, "payload");

    assert_eq!(response.status, StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body, serde_json::json!({"Id": 1}));
}

#[test]
fn test_empty_info_is_stored() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let response = server.send(json_request(Method::POST, "/item", Some(&token), "{}"));
    assert_eq!(response.status, StatusCode::OK);

    let item: serde_json::Value = server.get("/item/1", Some(&token)).json();
    assert_eq!(item, serde_json::json!({"Id": 1, "Info": ""}));
}
