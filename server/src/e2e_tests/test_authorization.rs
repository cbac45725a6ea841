//! Test the authorization middleware on protected routes.

use axum::http::StatusCode;

use crate::auth::{JwtConfig, jwt};
use crate::e2e_tests::helpers::*;
use crate::testing::TEST_SECRET;

#[test]
fn test_missing_token_is_bad_request() {
    let server = TestServer::new();

    for path in ["/item", "/item/1", "/welcome"] {
        let response = server.get(path, None);
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(response.text(), "no jwt token", "{path}");
    }
    assert_eq!(server.delete("/item", None).status, StatusCode::BAD_REQUEST);
}

#[test]
fn test_malformed_token_is_bad_request() {
    let server = TestServer::new();

    let response = server.get("/item", Some("not.a.jwt"));

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "bad token");
}

#[test]
fn test_foreign_signature_is_unauthorized() {
    let server = TestServer::new();
    let foreign = JwtConfig::new_hs256(b"not-the-server-secret".to_vec(), 3600).unwrap();
    let token = jwt::issue_token("mallory", START_TIME, &foreign).unwrap();

    let response = server.get("/item", Some(&token));

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[test]
fn test_expired_token_is_unauthorized() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    server.advance_clock(3599);
    assert_eq!(server.get("/item", Some(&token)).status, StatusCode::OK);

    server.advance_clock(1);
    let response = server.get("/item", Some(&token));
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.text(), "unauthorized");
}

#[test]
fn test_bearer_prefix_accepted() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let response = server.get("/item", Some(&format!("Bearer {token}")));

    assert_eq!(response.status, StatusCode::OK);
}

#[test]
fn test_token_signed_with_server_secret_needs_no_registration() {
    // Sessions are stateless: the gate trusts any correctly signed token
    let server = TestServer::new();
    let config = JwtConfig::new_hs256(TEST_SECRET.to_vec(), 3600).unwrap();
    let token = jwt::issue_token("ghost", START_TIME, &config).unwrap();

    assert_eq!(server.get("/item", Some(&token)).status, StatusCode::OK);
}

#[test]
fn test_auth_routes_are_public() {
    let server = TestServer::new();
    assert_eq!(server.register("alice", "pw").status, StatusCode::OK);
    assert_eq!(server.login("alice", "pw").status, StatusCode::OK);
}

#[test]
fn test_unknown_route_is_not_found() {
    let server = TestServer::new();
    assert_eq!(server.get("/nope", None).status, StatusCode::NOT_FOUND);
}
