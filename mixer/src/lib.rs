pub mod error;
pub mod control;
pub mod pactl;
pub mod state;
pub mod action;
pub mod dispatch;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export key types for easier access
pub use error::{MixerError, Result};
pub use control::{AudioControl, CommandOutput, Mutation, VolumeChange};
pub use pactl::Pactl;
pub use state::{read_state, VolumeState};
pub use action::{Action, ActionRequest, DEFAULT_STEP, MAX_LEVEL};
pub use dispatch::Dispatcher;
