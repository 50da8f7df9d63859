// Integration tests for the HTTP surface, driven through warp::test
pub mod volume_api_tests;
pub mod auth_tests;

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use mixer::mock::FakeControl;
use mixer::Dispatcher;
use serde_json::Value;
use server::ServerConfig;
use warp::http::Response;
use warp::{Filter, Reply};

/// Config pointing at the crate's own static directory
pub fn test_config() -> ServerConfig {
    ServerConfig::new().with_static_dir(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"))
}

/// Routes wired to `fake`, which stays available for inspecting calls
pub fn test_routes(
    fake: Arc<FakeControl>,
    config: ServerConfig,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone + 'static {
    server::routes(Arc::new(config), Dispatcher::new(fake))
}

pub fn json_body(response: &Response<Bytes>) -> Value {
    serde_json::from_slice(response.body()).expect("response body should be JSON")
}
