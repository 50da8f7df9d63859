use std::convert::Infallible;
use std::sync::Arc;

use mixer::Dispatcher;
use warp::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use warp::{Filter, Reply};

use crate::api;
use crate::auth;
use crate::config::ServerConfig;

/// Largest `POST /api/volume` body accepted; an action object is a few dozen bytes
pub const MAX_BODY_BYTES: u64 = 4 * 1024;

/// CORS headers attached to every response, including rejections
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type,X-Auth-Token"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers
}

/// Every route the server answers:
///
/// - `GET /` serves `index.html` from the static directory
/// - `GET /api/volume` reads the sink
/// - `POST /api/volume` applies an action and reads the sink again
/// - `OPTIONS` on either path answers CORS preflight without auth
pub fn routes(
    config: Arc<ServerConfig>,
    dispatcher: Dispatcher,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let token: Option<Arc<str>> = config.token.as_deref().map(Arc::from);
    let with_dispatcher = warp::any().map(move || dispatcher.clone());

    let index = warp::path::end()
        .and(warp::get())
        .and(warp::fs::file(config.static_dir.join("index.html")));

    let get_volume = warp::path!("api" / "volume")
        .and(warp::get())
        .and(auth::authorized(token.clone()))
        .and(with_dispatcher.clone())
        .and_then(api::get_volume);

    let post_volume = warp::path!("api" / "volume")
        .and(warp::post())
        .and(auth::authorized(token))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_dispatcher)
        .and_then(api::post_volume);

    let preflight = warp::path!("api" / "volume")
        .or(warp::path::end())
        .and(warp::options())
        .map(|_| warp::reply());

    index
        .or(get_volume)
        .or(post_volume)
        .or(preflight)
        .recover(api::handle_rejection)
        .with(warp::reply::with::headers(cors_headers()))
        .with(warp::log("server::http"))
}
