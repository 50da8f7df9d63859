//! HTTP front for the default sink's volume and mute state.
//!
//! The library half exists so the routes can be exercised with
//! `warp::test` against a fake `AudioControl`.

pub mod api;
pub mod auth;
pub mod config;
pub mod routes;

pub use config::{ConfigError, ServerConfig};
pub use routes::routes;
