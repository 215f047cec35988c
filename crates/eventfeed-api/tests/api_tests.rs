//! Integration tests for the Events API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use eventfeed_api::router::build_router;
use eventfeed_api::server::{ServerConfig, ServerError, start_server};
use eventfeed_api::state::AppState;
use eventfeed_store::{DocumentBackend, JsonFileBackend, MemoryBackend};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

fn memory_state() -> Arc<AppState<MemoryBackend>> {
    Arc::new(AppState::new(MemoryBackend::new()))
}

fn post_json(body: &str) -> Request<Body> {
    Request::post("/Events")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_alice_bob_scenario() {
    let router = build_router(memory_state());

    let (status, json) = send(&router, post_json(r#"{"user":"alice","msg":"hi"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"feeds": [{"user": "alice", "msg": "hi", "Manipulated": "Yes"}]})
    );

    let (status, json) = send(&router, get("/Events?user=alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"user": "alice", "msg": "hi", "Manipulated": "Yes"}));

    let (status, json) = send(&router, get("/Events?user=bob")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"Error": "UserNotFound"}));
}

#[tokio::test]
async fn test_post_returns_whole_document() {
    let router = build_router(memory_state());

    send(&router, post_json(r#"{"user":"a"}"#)).await;
    let (status, json) = send(&router, post_json(r#"{"user":"b","Manipulated":"No"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    let feeds = json["feeds"].as_array().unwrap();
    assert_eq!(feeds.len(), 2);
    assert_eq!(feeds[0]["user"], "a");
    assert_eq!(feeds[1]["user"], "b");
    assert_eq!(feeds[1]["Manipulated"], "Yes");
}

#[tokio::test]
async fn test_get_on_empty_store_is_user_not_found() {
    let router = build_router(memory_state());

    let (status, json) = send(&router, get("/Events?user=anyone")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"Error": "UserNotFound"}));
}

#[tokio::test]
async fn test_get_without_user_is_bad_request() {
    let router = build_router(memory_state());

    let (status, json) = send(&router, get("/Events")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().unwrap().contains("user"));
}

#[tokio::test]
async fn test_malformed_bodies_are_bad_request() {
    let state = memory_state();
    let router = build_router(Arc::clone(&state));

    for body in ["not json", "[1, 2, 3]", "\"text\"", "42", ""] {
        let (status, json) = send(&router, post_json(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body:?}");
        assert_eq!(json["status"], 400);
    }

    // Missing content type is rejected the same way.
    let request = Request::post("/Events")
        .body(Body::from(r#"{"user":"alice"}"#))
        .unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing reached the store.
    let doc = state.store.backend().load().await.unwrap();
    assert!(doc.feeds.is_empty());
}

#[tokio::test]
async fn test_missing_store_is_server_error() {
    let state = Arc::new(AppState::new(MemoryBackend::missing()));
    let router = build_router(state);

    let (status, json) = send(&router, post_json(r#"{"user":"alice"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], 500);

    let (status, _) = send(&router, get("/Events?user=alice")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_corrupt_store_is_server_error_and_untouched() {
    let state = Arc::new(AppState::new(MemoryBackend::from_raw("{\"feeds\":")));
    let router = build_router(Arc::clone(&state));

    let (status, _) = send(&router, post_json(r#"{"user":"alice"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&router, get("/Events?user=alice")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(state.store.backend().raw().await.as_deref(), Some("{\"feeds\":"));
}

#[tokio::test]
async fn test_file_backed_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(&path, r#"{"feeds":[]}"#).unwrap();

    let state = Arc::new(AppState::new(JsonFileBackend::new(&path)));
    let router = build_router(state);

    let (status, _) = send(&router, post_json(r#"{"Shraddha":"pallet 7 dispatched"}"#)).await;
    assert_eq!(status, StatusCode::OK);

    let on_disk: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(
        on_disk,
        json!({"feeds": [{"Shraddha": "pallet 7 dispatched", "Manipulated": "Yes"}]})
    );
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let router = build_router(memory_state());

    let request = Request::post("/Events")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Body::from(r#"{"Shraddha":"hello"}"#))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let allow_origin = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(allow_origin, "*");
}

#[tokio::test]
async fn test_unknown_method_is_rejected() {
    let router = build_router(memory_state());

    let response = router
        .oneshot(Request::delete("/Events").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_start_server_rejects_invalid_address() {
    let config = ServerConfig {
        host: String::from("definitely not an address"),
        port: 8999,
    };
    let result = start_server(&config, memory_state(), std::future::pending()).await;
    assert!(matches!(result, Err(ServerError::Bind(_))));
}

#[tokio::test]
async fn test_start_server_returns_after_shutdown_signal() {
    let config = ServerConfig {
        host: String::from("127.0.0.1"),
        port: 0,
    };
    let result = start_server(&config, memory_state(), async {}).await;
    assert!(result.is_ok());
}
