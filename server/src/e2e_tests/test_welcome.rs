//! Test the welcome view.

use axum::http::StatusCode;

use crate::auth::{JwtConfig, jwt};
use crate::e2e_tests::helpers::*;
use crate::testing::TEST_SECRET;

#[test]
fn test_welcome_names_the_subject() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let response = server.get("/welcome", Some(&token));

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type().unwrap().starts_with("text/html"));
    assert!(response.text().contains("Hello, alice!"));
}

#[test]
fn test_welcome_escapes_the_subject() {
    let server = TestServer::new();
    let config = JwtConfig::new_hs256(TEST_SECRET.to_vec(), 3600).unwrap();
    let token = jwt::issue_token("<b>eve</b>", START_TIME, &config).unwrap();

    let response = server.get("/welcome", Some(&token));

    assert_eq!(response.status, StatusCode::OK);
    let text = response.text();
    assert!(text.contains("&lt;b&gt;eve&lt;/b&gt;"));
    assert!(!text.contains("<b>eve</b>"));
}

#[test]
fn test_welcome_without_token() {
    let server = TestServer::new();

    let response = server.get("/welcome", None);

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "no jwt token");
}
