//! Shared-secret gating of the volume endpoints.

use std::sync::Arc;

use mixer::mock::FakeControl;
use serde_json::json;
use warp::http::StatusCode;

use super::{json_body, test_config, test_routes};

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let fake = Arc::new(FakeControl::new(40, false));
    let routes = test_routes(fake.clone(), test_config().with_token("s3cret"));

    let response = warp::test::request()
        .method("GET")
        .path("/api/volume")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_wrong_token_is_rejected() {
    let fake = Arc::new(FakeControl::new(40, false));
    let routes = test_routes(fake.clone(), test_config().with_token("s3cret"));

    let response = warp::test::request()
        .method("POST")
        .path("/api/volume")
        .header("X-Auth-Token", "guess")
        .json(&json!({"action": "mute"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(fake.calls().is_empty());
    assert!(!fake.muted());
}

#[tokio::test]
async fn test_header_token_is_accepted() {
    let fake = Arc::new(FakeControl::new(40, false));
    let routes = test_routes(fake.clone(), test_config().with_token("s3cret"));

    let response = warp::test::request()
        .method("POST")
        .path("/api/volume")
        .header("X-Auth-Token", "s3cret")
        .json(&json!({"action": "up", "step": 10}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(&response), json!({"ok": true, "volume": 50, "muted": false}));
}

#[tokio::test]
async fn test_query_token_is_accepted() {
    let fake = Arc::new(FakeControl::new(40, false));
    let routes = test_routes(fake, test_config().with_token("s3cret"));

    let response = warp::test::request()
        .method("GET")
        .path("/api/volume?token=s3cret")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(&response), json!({"volume": 40, "muted": false}));
}

#[tokio::test]
async fn test_no_secret_means_open_access() {
    let fake = Arc::new(FakeControl::new(40, false));
    let routes = test_routes(fake, test_config());

    let response = warp::test::request()
        .method("GET")
        .path("/api/volume?token=whatever")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}
