//! Happy-path behaviour of `GET`/`POST /api/volume` and `GET /`.

use std::sync::Arc;

use mixer::mock::{Call, FakeControl};
use mixer::{Mutation, VolumeChange};
use serde_json::json;
use warp::http::StatusCode;

use super::{json_body, test_config, test_routes};

#[tokio::test]
async fn test_get_volume() {
    let fake = Arc::new(FakeControl::new(40, false));
    let routes = test_routes(fake.clone(), test_config());

    let response = warp::test::request()
        .method("GET")
        .path("/api/volume")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(&response), json!({"volume": 40, "muted": false}));
    assert_eq!(fake.calls(), vec![Call::QueryLevel, Call::QueryMute]);
}

#[tokio::test]
async fn test_post_up_with_step() {
    let fake = Arc::new(FakeControl::new(40, false));
    let routes = test_routes(fake.clone(), test_config());

    let response = warp::test::request()
        .method("POST")
        .path("/api/volume")
        .json(&json!({"action": "up", "step": 10}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(&response), json!({"ok": true, "volume": 50, "muted": false}));
    assert_eq!(
        fake.calls(),
        vec![
            Call::Mutate(Mutation::SetVolume(VolumeChange::Relative(10))),
            Call::QueryLevel,
            Call::QueryMute,
        ]
    );
    assert_eq!(fake.mutations()[0].argument(), "+10%");
}

#[tokio::test]
async fn test_post_down_uses_default_step() {
    let fake = Arc::new(FakeControl::new(40, false));
    let routes = test_routes(fake.clone(), test_config());

    let response = warp::test::request()
        .method("POST")
        .path("/api/volume")
        .json(&json!({"action": "down"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(&response)["volume"], json!(35));
    assert_eq!(fake.mutations()[0].argument(), "-5%");
}

#[tokio::test]
async fn test_post_mute_toggles() {
    let fake = Arc::new(FakeControl::new(40, false));
    let routes = test_routes(fake.clone(), test_config());

    let response = warp::test::request()
        .method("POST")
        .path("/api/volume")
        .json(&json!({"action": "mute"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(&response), json!({"ok": true, "volume": 40, "muted": true}));
    assert_eq!(fake.mutations(), vec![Mutation::ToggleMute]);
    assert!(!fake.mutations()[0].argument().contains('%'));
}

#[tokio::test]
async fn test_post_set_accepts_both_forms() {
    for value in [json!("50"), json!("50%"), json!(50)] {
        let fake = Arc::new(FakeControl::new(10, false));
        let routes = test_routes(fake.clone(), test_config());

        let response = warp::test::request()
            .method("POST")
            .path("/api/volume")
            .json(&json!({"action": "set", "value": value}))
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(&response)["volume"], json!(50));
        assert_eq!(fake.mutations(), vec![Mutation::SetVolume(VolumeChange::Absolute(50))]);
        assert_eq!(fake.mutations()[0].argument(), "50%");
    }
}

#[tokio::test]
async fn test_post_read_is_pure() {
    let fake = Arc::new(FakeControl::new(65, true));
    let routes = test_routes(fake.clone(), test_config());

    let response = warp::test::request()
        .method("POST")
        .path("/api/volume")
        .json(&json!({"action": "read"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(&response), json!({"ok": true, "volume": 65, "muted": true}));
    assert!(fake.mutations().is_empty());
}

#[tokio::test]
async fn test_cors_headers_on_success() {
    let fake = Arc::new(FakeControl::new(40, false));
    let routes = test_routes(fake, test_config());

    let response = warp::test::request()
        .method("GET")
        .path("/api/volume")
        .reply(&routes)
        .await;

    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET,POST,OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type,X-Auth-Token");
}

#[tokio::test]
async fn test_preflight() {
    let fake = Arc::new(FakeControl::new(40, false));
    let routes = test_routes(fake.clone(), test_config().with_token("s3cret"));

    let response = warp::test::request()
        .method("OPTIONS")
        .path("/api/volume")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_index_page() {
    let fake = Arc::new(FakeControl::new(40, false));
    let routes = test_routes(fake.clone(), test_config().with_token("s3cret"));

    let response = warp::test::request().method("GET").path("/").reply(&routes).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(String::from_utf8_lossy(response.body()).contains("/api/volume"));
    assert!(fake.calls().is_empty());
}
