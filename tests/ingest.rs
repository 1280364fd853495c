//! Integration tests for message ingestion and point lookup.
//!
//! Spins up the real axum router over an in-memory store and drives it via
//! `tower::ServiceExt::oneshot` (no TCP listener needed). Covers the full
//! write-then-read scenario: insert, idempotent re-delivery of the same
//! msg_id, point lookup, and the 404 path.

use std::sync::Arc;

use axum::body::Body;
use http::Request;
use tower::ServiceExt;

use grouplog::api::{create_router, AppState};
use grouplog::storage::MessageStore;

/// Build a router over a fresh in-memory store.
async fn setup_app() -> axum::Router {
    let store = MessageStore::open_in_memory()
        .await
        .expect("open in-memory store");
    create_router(AppState {
        store: Arc::new(store),
    })
}

/// Parse the response body as JSON and return (status_code, json_value).
async fn parse_body(response: axum::response::Response) -> (http::StatusCode, serde_json::Value) {
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
        .await
        .expect("read body");
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap_or_default();
    (status, json)
}

fn post_message(body: serde_json::Value) -> Request<Body> {
    Request::post("/messages")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn m1_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "msg_id": "m1",
        "group_id": "g1",
        "group_name": "Team",
        "sender_id": "u1",
        "sender_name": "Alice",
        "content": content,
        "msg_type": "text",
        "create_time": 1000
    })
}

#[tokio::test]
async fn test_ingest_then_lookup_roundtrip() {
    let app = setup_app().await;

    let response = app.clone().oneshot(post_message(m1_body("hi"))).await.unwrap();
    let (status, json) = parse_body(response).await;
    assert_eq!(status, http::StatusCode::CREATED);
    assert_eq!(json["status"], "ok");

    let request = Request::get("/messages/m1").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let (status, json) = parse_body(response).await;

    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(json["msg_id"], "m1");
    assert_eq!(json["group_id"], "g1");
    assert_eq!(json["group_name"], "Team");
    assert_eq!(json["sender_id"], "u1");
    assert_eq!(json["sender_name"], "Alice");
    assert_eq!(json["content"], "hi");
    assert_eq!(json["msg_type"], "text");
    assert_eq!(json["create_time"], 1000);
}

#[tokio::test]
async fn test_duplicate_delivery_keeps_first_record() {
    let app = setup_app().await;

    let response = app.clone().oneshot(post_message(m1_body("hi"))).await.unwrap();
    let (status, _) = parse_body(response).await;
    assert_eq!(status, http::StatusCode::CREATED);

    // Re-delivery with different content must not error or overwrite.
    let response = app
        .clone()
        .oneshot(post_message(m1_body("something else")))
        .await
        .unwrap();
    let (status, json) = parse_body(response).await;
    assert_eq!(status, http::StatusCode::CREATED);
    assert_eq!(json["status"], "duplicate");

    // Exactly one row, with the original content.
    let request = Request::get("/messages?group_id=g1")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let (status, json) = parse_body(response).await;
    assert_eq!(status, http::StatusCode::OK);
    let rows = json.as_array().expect("array body");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["content"], "hi");

    let request = Request::get("/messages/m1").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let (status, json) = parse_body(response).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(json["content"], "hi");
}

#[tokio::test]
async fn test_unknown_message_id_is_404() {
    let app = setup_app().await;

    let response = app
        .clone()
        .oneshot(post_message(m1_body("hi")))
        .await
        .unwrap();
    assert_eq!(response.status(), http::StatusCode::CREATED);

    let request = Request::get("/messages/m2").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let (status, json) = parse_body(response).await;

    assert_eq!(status, http::StatusCode::NOT_FOUND);
    assert!(json["error"]["message"]
        .as_str()
        .expect("error message")
        .contains("m2"));
}

#[tokio::test]
async fn test_missing_identifier_is_rejected() {
    let app = setup_app().await;

    let mut body = m1_body("hi");
    body["group_id"] = serde_json::json!("");

    let response = app.clone().oneshot(post_message(body)).await.unwrap();
    let (status, json) = parse_body(response).await;

    assert_eq!(status, http::StatusCode::BAD_REQUEST);
    assert!(json["error"]["message"]
        .as_str()
        .expect("error message")
        .contains("group_id"));

    // Nothing was stored.
    let request = Request::get("/messages").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let (_, json) = parse_body(response).await;
    assert_eq!(json.as_array().expect("array body").len(), 0);
}

#[tokio::test]
async fn test_health() {
    let app = setup_app().await;

    let request = Request::get("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let (status, json) = parse_body(response).await;

    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(json["status"], "ok");
}
