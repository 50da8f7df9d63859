//! Test doubles for `AudioControl`.
//!
//! `MockAudioControl` is the mockall-generated mock for strict call
//! expectations. `FakeControl` simulates a sink in memory and answers in the
//! same text format as `pactl`, recording every call it receives.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::control::{AudioControl, CommandOutput, Mutation, VolumeChange};
use crate::error::{MixerError, Result};

pub use crate::control::MockAudioControl;

/// One call received by a `FakeControl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    QueryLevel,
    QueryMute,
    Mutate(Mutation),
}

#[derive(Debug, Default)]
struct FakeSink {
    level: u32,
    muted: bool,
    level_output: Option<CommandOutput>,
    mutate_failure: Option<String>,
    level_failure: Option<String>,
    mute_failure: bool,
    calls: Vec<Call>,
}

#[derive(Debug, Default)]
pub struct FakeControl {
    sink: Mutex<FakeSink>,
}

impl FakeControl {
    pub fn new(level: u32, muted: bool) -> Self {
        Self {
            sink: Mutex::new(FakeSink {
                level,
                muted,
                ..FakeSink::default()
            }),
        }
    }

    /// Answer level queries with `output` instead of the simulated level.
    pub fn with_level_output(self, output: CommandOutput) -> Self {
        self.lock().level_output = Some(output);
        self
    }

    /// Make every mutation exit non-zero with `stderr`.
    pub fn failing_mutations(self, stderr: impl Into<String>) -> Self {
        self.lock().mutate_failure = Some(stderr.into());
        self
    }

    /// Make level queries exit non-zero with `stderr`.
    pub fn failing_level_query(self, stderr: impl Into<String>) -> Self {
        self.lock().level_failure = Some(stderr.into());
        self
    }

    pub fn failing_mute_query(self) -> Self {
        self.lock().mute_failure = true;
        self
    }

    pub fn level(&self) -> u32 {
        self.lock().level
    }

    pub fn muted(&self) -> bool {
        self.lock().muted
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Mutate(mutation) => Some(mutation.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, FakeSink> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AudioControl for FakeControl {
    fn query_level(&self) -> Result<CommandOutput> {
        let mut sink = self.lock();
        sink.calls.push(Call::QueryLevel);

        if let Some(stderr) = &sink.level_failure {
            return Ok(CommandOutput::failure(stderr.clone()));
        }
        if let Some(output) = &sink.level_output {
            return Ok(output.clone());
        }

        let raw = sink.level * 65536 / 100;
        Ok(CommandOutput::success(format!(
            "Volume: front-left: {raw} / {level}% / 0.00 dB,   front-right: {raw} / {level}% / 0.00 dB\n        balance 0.00\n",
            raw = raw,
            level = sink.level
        )))
    }

    fn query_mute(&self) -> Result<CommandOutput> {
        let mut sink = self.lock();
        sink.calls.push(Call::QueryMute);

        if sink.mute_failure {
            return Err(MixerError::ExternalCommand("mute query unavailable".to_string()));
        }
        let answer = if sink.muted { "yes" } else { "no" };
        Ok(CommandOutput::success(format!("Mute: {}\n", answer)))
    }

    fn mutate(&self, mutation: &Mutation) -> Result<CommandOutput> {
        let mut sink = self.lock();
        sink.calls.push(Call::Mutate(mutation.clone()));

        if let Some(stderr) = &sink.mutate_failure {
            return Ok(CommandOutput::failure(stderr.clone()));
        }

        match mutation {
            Mutation::SetVolume(VolumeChange::Relative(delta)) => {
                let level = (i64::from(sink.level) + delta).max(0);
                sink.level = u32::try_from(level).unwrap_or(u32::MAX);
            }
            Mutation::SetVolume(VolumeChange::Absolute(level)) => sink.level = *level,
            Mutation::ToggleMute => sink.muted = !sink.muted,
        }
        Ok(CommandOutput::success(""))
    }
}
