//! Test deleting every item.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;

#[test]
fn test_delete_all_clears_listing() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");
    for info in ["a", "b", "c"] {
        let _ = server.add_item_id(&token, info);
    }

    let response = server.delete("/item", Some(&token));
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "OK");

    assert_eq!(server.get("/item", Some(&token)).text(), "[]");
    assert_eq!(
        server.get("/item/2", Some(&token)).status,
        StatusCode::BAD_REQUEST
    );
}

#[test]
fn test_delete_all_keeps_id_counter() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");
    assert_eq!(server.add_item_id(&token, "a"), 1);
    assert_eq!(server.add_item_id(&token, "b"), 2);

    assert_eq!(server.delete("/item", Some(&token)).status, StatusCode::OK);

    assert_eq!(server.add_item_id(&token, "c"), 3);
}

#[test]
fn test_delete_all_on_empty_store() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let response = server.delete("/item", Some(&token));

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "OK");
}
