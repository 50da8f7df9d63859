use std::fmt;

use crate::error::Result;

/// Outcome of a single call to the external audio tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub succeeded: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// A change to the sink's volume, rendered the way the tool expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChange {
    /// Signed percentage delta, rendered as `+N%` or `-N%`
    Relative(i64),
    /// Absolute percentage, rendered as `N%`
    Absolute(u32),
}

impl fmt::Display for VolumeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeChange::Relative(delta) if *delta < 0 => write!(f, "-{}%", delta.unsigned_abs()),
            VolumeChange::Relative(delta) => write!(f, "+{}%", delta),
            VolumeChange::Absolute(level) => write!(f, "{}%", level),
        }
    }
}

/// The mutating calls the dispatcher can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetVolume(VolumeChange),
    ToggleMute,
}

impl Mutation {
    /// Argument passed to the tool after the sink name.
    pub fn argument(&self) -> String {
        match self {
            Mutation::SetVolume(change) => change.to_string(),
            Mutation::ToggleMute => "toggle".to_string(),
        }
    }
}

/// Narrow seam over the external audio-control tool.
///
/// `Err` means the call could not be made or did not finish in time. A call
/// that ran but exited non-zero is `Ok` with `succeeded == false`, leaving the
/// caller to decide whether that failure matters.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait AudioControl: Send + Sync {
    /// Query the default sink's volume; the text contains `<digits>%` tokens.
    fn query_level(&self) -> Result<CommandOutput>;

    /// Query the default sink's mute flag; the text contains "yes" when muted.
    fn query_mute(&self) -> Result<CommandOutput>;

    /// Issue exactly one mutating call.
    fn mutate(&self, mutation: &Mutation) -> Result<CommandOutput>;
}
