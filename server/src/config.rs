use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use mixer::Pactl;

/// The crate's own `static/` directory, so `cargo run -p server` serves the
/// page from any working directory. Installed binaries set `VOLUME_STATIC_DIR`.
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Errors raised while reading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("{name} must be greater than 0")]
    Zero { name: &'static str },
}

/// Server configuration, built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shared secret; `None` leaves the API open
    pub token: Option<String>,
    /// Directory holding `index.html`
    pub static_dir: PathBuf,
    /// Sink passed to every pactl call
    pub sink: String,
    /// Path or name of the pactl binary
    pub pactl: String,
    /// Upper bound on a single pactl call
    pub command_timeout: Duration,
    pub log_level: LevelFilter,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            token: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            sink: mixer::pactl::DEFAULT_SINK.to_string(),
            pactl: mixer::pactl::DEFAULT_PROGRAM.to_string(),
            command_timeout: mixer::pactl::DEFAULT_TIMEOUT,
            log_level: LevelFilter::Info,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unset variables keep their defaults. An empty `VOLUME_TOKEN` counts
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT") {
            config.port = parse("PORT", &port)?;
        }
        if let Some(bind) = lookup("VOLUME_BIND") {
            config.bind = parse("VOLUME_BIND", &bind)?;
        }
        config.token = lookup("VOLUME_TOKEN").filter(|token| !token.is_empty());
        if let Some(dir) = lookup("VOLUME_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(sink) = lookup("VOLUME_SINK").filter(|sink| !sink.is_empty()) {
            config.sink = sink;
        }
        if let Some(pactl) = lookup("VOLUME_PACTL").filter(|pactl| !pactl.is_empty()) {
            config.pactl = pactl;
        }
        if let Some(timeout) = lookup("VOLUME_TIMEOUT_MS") {
            let millis: u64 = parse("VOLUME_TIMEOUT_MS", &timeout)?;
            if millis == 0 {
                return Err(ConfigError::Zero { name: "VOLUME_TIMEOUT_MS" });
            }
            config.command_timeout = Duration::from_millis(millis);
        }
        if let Some(level) = lookup("VOLUME_LOG_LEVEL") {
            config.log_level = parse("VOLUME_LOG_LEVEL", &level)?;
        }

        Ok(config)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// The pactl backend described by this configuration
    pub fn pactl(&self) -> Pactl {
        Pactl::new()
            .with_program(self.pactl.clone())
            .with_sink(self.sink.clone())
            .with_timeout(self.command_timeout)
    }
}

fn parse<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}
