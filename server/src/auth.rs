use std::collections::HashMap;
use std::sync::Arc;

use warp::{Filter, Rejection};

/// Header carrying the shared secret
pub const AUTH_HEADER: &str = "x-auth-token";

/// Query parameter carrying the shared secret when the header is absent
pub const AUTH_QUERY_PARAM: &str = "token";

/// Rejection raised when a request doesn't present the shared secret
#[derive(Debug)]
pub struct Unauthorized;

impl warp::reject::Reject for Unauthorized {}

/// Check a caller's credentials against the configured secret.
///
/// With no secret configured every request passes. Otherwise the header
/// is used when present and non-empty, falling back to the query parameter.
pub fn is_authorized(expected: Option<&str>, header: Option<&str>, query: Option<&str>) -> bool {
    let expected = match expected {
        Some(expected) => expected,
        None => return true,
    };

    let presented = header.filter(|token| !token.is_empty()).or(query);
    presented == Some(expected)
}

/// Filter that rejects with `Unauthorized` unless the request carries `token`.
pub fn authorized(token: Option<Arc<str>>) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    let query = warp::query::<HashMap<String, String>>()
        .or(warp::any().map(HashMap::new))
        .unify();

    warp::header::optional::<String>(AUTH_HEADER)
        .and(query)
        .and_then(move |header: Option<String>, query: HashMap<String, String>| {
            let token = token.clone();
            async move {
                let presented = query.get(AUTH_QUERY_PARAM).map(String::as_str);
                if is_authorized(token.as_deref(), header.as_deref(), presented) {
                    Ok(())
                } else {
                    log::debug!("Rejecting request without a valid token");
                    Err(warp::reject::custom(Unauthorized))
                }
            }
        })
        .untuple_one()
}
