use std::convert::Infallible;

use bytes::Bytes;
use mixer::{ActionRequest, Dispatcher, MixerError, VolumeState};
use serde::Serialize;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::auth::Unauthorized;

/// Reply body for `GET /api/volume`
#[derive(Debug, Serialize)]
pub struct VolumeReply {
    pub volume: Option<u32>,
    pub muted: bool,
}

/// Reply body for a successful `POST /api/volume`
#[derive(Debug, Serialize)]
pub struct ActionReply {
    pub ok: bool,
    pub volume: Option<u32>,
    pub muted: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorReply {
    pub error: String,
}

impl From<VolumeState> for VolumeReply {
    fn from(state: VolumeState) -> Self {
        Self {
            volume: state.volume,
            muted: state.muted,
        }
    }
}

impl From<VolumeState> for ActionReply {
    fn from(state: VolumeState) -> Self {
        Self {
            ok: true,
            volume: state.volume,
            muted: state.muted,
        }
    }
}

/// Failures surfaced by the volume endpoints
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Mixer(#[from] MixerError),

    /// The blocking task panicked or was cancelled
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Mixer(MixerError::InvalidAction(_)) => StatusCode::BAD_REQUEST,
            ApiError::Mixer(MixerError::ExternalCommand(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Reply for ApiError {
    fn into_response(self) -> Response {
        json_response(&ErrorReply { error: self.to_string() }, self.status())
    }
}

fn json_response<T: Serialize>(body: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

/// Run a core call off the async runtime; it blocks on the external tool.
async fn run_blocking<F>(call: F) -> Result<VolumeState, ApiError>
where
    F: FnOnce() -> mixer::Result<VolumeState> + Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            log::error!("Volume task failed: {}", e);
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

pub async fn get_volume(dispatcher: Dispatcher) -> Result<Response, Infallible> {
    let result = run_blocking(move || dispatcher.read()).await;

    Ok(match result {
        Ok(state) => json_response(&VolumeReply::from(state), StatusCode::OK),
        Err(e) => {
            log::warn!("Volume read failed: {}", e);
            e.into_response()
        }
    })
}

pub async fn post_volume(body: Bytes, dispatcher: Dispatcher) -> Result<Response, Infallible> {
    let request = ActionRequest::from_body(&body);
    let result = run_blocking(move || dispatcher.dispatch(&request)).await;

    Ok(match result {
        Ok(state) => json_response(&ActionReply::from(state), StatusCode::OK),
        Err(e) => {
            log::warn!("Volume action failed: {}", e);
            e.into_response()
        }
    })
}

/// Map rejections onto the API's status codes.
///
/// Auth, routing, method and body-size failures carry no body; anything
/// else is an internal fault and gets the usual `{"error": ...}` shape.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let status = if err.find::<Unauthorized>().is_some() {
        StatusCode::UNAUTHORIZED
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        StatusCode::PAYLOAD_TOO_LARGE
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        StatusCode::LENGTH_REQUIRED
    } else if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        StatusCode::METHOD_NOT_ALLOWED
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        return Ok(ApiError::Internal("internal server error".to_string()).into_response());
    };

    Ok(warp::reply::with_status(warp::reply(), status).into_response())
}
