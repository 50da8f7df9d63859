#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MixerError {
  /// Missing or unrecognized action, or a step/value that could not be coerced.
  #[error("{0}")]
  InvalidAction(String),

  /// The external audio tool could not be run, exited non-zero, or timed out.
  #[error("{0}")]
  ExternalCommand(String),
}

impl MixerError {
  pub fn invalid_action() -> Self {
    MixerError::InvalidAction("invalid action".to_string())
  }
}

pub type Result<T> = std::result::Result<T, MixerError>;
