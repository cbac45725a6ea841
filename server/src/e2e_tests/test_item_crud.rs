//! Test item insert, fetch, list and delete through the HTTP surface.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;

#[test]
fn test_insert_fetch_delete_sequence() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    // Step 1: Insert two items
    assert_eq!(server.add_item_id(&token, "a"), 1);
    assert_eq!(server.add_item_id(&token, "b"), 2);

    // Step 2: Delete the first
    let response = server.delete("/item/1", Some(&token));
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "OK");

    // Step 3: It can no longer be fetched
    let response = server.get("/item/1", Some(&token));
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "cannot find item 1");

    // Step 4: Only the second remains
    let response = server.get("/item", Some(&token));
    assert_eq!(response.status, StatusCode::OK);
    let items: serde_json::Value = response.json();
    assert_eq!(items, serde_json::json!([{"Id": 2, "Info": "b"}]));
}

#[test]
fn test_get_item_by_id() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");
    let id = server.add_item_id(&token, "hello");

    let response = server.get(&format!("/item/{id}"), Some(&token));

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type(), Some("application/json"));
    let item: serde_json::Value = response.json();
    assert_eq!(item, serde_json::json!({"Id": id, "Info": "hello"}));
}

#[test]
fn test_list_empty_store() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let response = server.get("/item", Some(&token));

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "[]");
}

#[test]
fn test_delete_missing_item_writes_error_only() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let response = server.delete("/item/7", Some(&token));

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "no such item (id = 7)");
}

#[test]
fn test_delete_twice() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");
    let id = server.add_item_id(&token, "x");

    assert_eq!(
        server.delete(&format!("/item/{id}"), Some(&token)).status,
        StatusCode::OK
    );
    assert_eq!(
        server.delete(&format!("/item/{id}"), Some(&token)).status,
        StatusCode::BAD_REQUEST
    );
}

#[test]
fn test_non_numeric_id() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let response = server.get("/item/abc", Some(&token));
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "invalid item id: abc");

    let response = server.delete("/item/-1", Some(&token));
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[test]
fn test_ids_not_reused_after_delete() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let first = server.add_item_id(&token, "a");
    assert_eq!(
        server.delete(&format!("/item/{first}"), Some(&token)).status,
        StatusCode::OK
    );

    assert_eq!(server.add_item_id(&token, "b"), first + 1);
}

#[test]
fn test_items_shared_between_users() {
    let server = TestServer::new();
    let alice = server.token_for("alice", "pw");
    let bob = server.token_for("bob", "pw");

    let id = server.add_item_id(&alice, "from alice");

    let response = server.get(&format!("/item/{id}"), Some(&bob));
    assert_eq!(response.status, StatusCode::OK);
}
