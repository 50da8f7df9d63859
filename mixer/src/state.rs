use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::control::AudioControl;
use crate::error::{MixerError, Result};

lazy_static! {
    static ref LEVEL_TOKEN: Regex = Regex::new(r"(\d+)%").unwrap();
}

/// Volume and mute flag of the default sink, as read just now.
///
/// `volume` is `None` when the tool answered but printed no percentage.
/// Zero is a real volume and is never used to mean "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VolumeState {
    pub volume: Option<u32>,
    pub muted: bool,
}

/// First `<digits>%` token in the tool's output.
pub fn parse_level(output: &str) -> Option<u32> {
    LEVEL_TOKEN
        .captures(output)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

pub fn parse_muted(output: &str) -> bool {
    output.to_lowercase().contains("yes")
}

/// Query the tool for level and mute state.
///
/// A failing level query is an error. A failing mute query is reported as
/// "not muted": mute state being unavailable must not block a volume read.
pub fn read_state(control: &dyn AudioControl) -> Result<VolumeState> {
    let level = control.query_level()?;
    if !level.succeeded {
        return Err(external_failure(&level.stderr, "volume query failed"));
    }
    let volume = parse_level(&level.stdout);
    if volume.is_none() {
        log::debug!("No volume percentage in output: {:?}", level.stdout);
    }

    let muted = match control.query_mute() {
        Ok(output) if output.succeeded => parse_muted(&output.stdout),
        Ok(output) => {
            log::debug!("Mute query failed, assuming unmuted: {}", output.stderr.trim());
            false
        }
        Err(e) => {
            log::debug!("Mute query failed, assuming unmuted: {}", e);
            false
        }
    };

    Ok(VolumeState { volume, muted })
}

/// Wrap a failed call's stderr, falling back to `context` when it printed nothing.
pub(crate) fn external_failure(stderr: &str, context: &str) -> MixerError {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        MixerError::ExternalCommand(context.to_string())
    } else {
        MixerError::ExternalCommand(stderr.to_string())
    }
}
