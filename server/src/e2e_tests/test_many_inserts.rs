//! Test that many inserts produce unique, increasing IDs.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;

#[test]
fn test_many_inserts() {
    let server = TestServer::new();
    let token = server.token_for("alice", "pw");

    let ids: Vec<u64> = (0..100)
        .map(|i| server.add_item_id(&token, &format!("item {i}")))
        .collect();

    let expected: Vec<u64> = (1..=100).collect();
    assert_eq!(ids, expected);

    let response = server.get("/item", Some(&token));
    assert_eq!(response.status, StatusCode::OK);
    let items: Vec<serde_json::Value> = response.json();
    assert_eq!(items.len(), 100);
    assert_eq!(items[41], serde_json::json!({"Id": 42, "Info": "item 41"}));
}
