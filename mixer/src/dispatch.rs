use std::sync::Arc;

use crate::action::{Action, ActionRequest};
use crate::control::AudioControl;
use crate::error::Result;
use crate::state::{self, external_failure, VolumeState};

/// Turns validated requests into calls against an `AudioControl`.
///
/// Holds no state of its own between requests; every call reads the sink
/// afresh so the reply always reflects what the tool reports right now.
#[derive(Clone)]
pub struct Dispatcher {
    control: Arc<dyn AudioControl>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(control: Arc<dyn AudioControl>) -> Self {
        Self { control }
    }

    pub fn read(&self) -> Result<VolumeState> {
        state::read_state(self.control.as_ref())
    }

    /// Validate `request`, issue at most one mutating call and re-read state.
    ///
    /// Validation errors return before the tool is touched. If the mutation
    /// fails, state is not re-read.
    pub fn dispatch(&self, request: &ActionRequest) -> Result<VolumeState> {
        let action = Action::from_request(request)?;
        self.apply(action)
    }

    pub fn apply(&self, action: Action) -> Result<VolumeState> {
        if let Some(mutation) = action.mutation() {
            log::info!("Applying {} ({})", action.name(), mutation.argument());

            let output = self.control.mutate(&mutation)?;
            if !output.succeeded {
                let err = external_failure(&output.stderr, "volume change failed");
                log::warn!("{} failed: {}", action.name(), err);
                return Err(err);
            }
        }

        self.read()
    }
}
