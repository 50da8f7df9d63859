use serde::Deserialize;
use serde_json::Value;

use crate::control::{Mutation, VolumeChange};
use crate::error::{MixerError, Result};

/// Step used by `up`/`down` when the request doesn't carry one.
pub const DEFAULT_STEP: u32 = 5;

/// Highest level accepted for `set` and for a single `up`/`down` step.
pub const MAX_LEVEL: u32 = 150;

/// Raw body of a `POST /api/volume` request, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActionRequest {
    pub action: Option<String>,
    pub step: Option<Value>,
    pub value: Option<Value>,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }

    pub fn with_step(mut self, step: impl Into<Value>) -> Self {
        self.step = Some(step.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Parse a request body leniently: anything that isn't a JSON object is
    /// treated as an empty request, which then fails validation as an invalid
    /// action rather than as a transport error.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                log::debug!("Ignoring unparseable request body: {}", e);
                Self::default()
            }
        }
    }
}

/// A validated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Up { step: u32 },
    Down { step: u32 },
    Mute,
    Set { level: u32 },
}

impl Action {
    pub fn from_request(request: &ActionRequest) -> Result<Self> {
        let action = request.action.as_deref().ok_or_else(MixerError::invalid_action)?;

        // step is coerced for every action, so a bad step never reaches the tool
        let step = match action {
            "read" | "up" | "down" | "mute" | "set" => parse_step(request.step.as_ref())?,
            _ => return Err(MixerError::invalid_action()),
        };

        match action {
            "up" => Ok(Action::Up { step }),
            "down" => Ok(Action::Down { step }),
            "mute" => Ok(Action::Mute),
            "set" => Ok(Action::Set { level: parse_level(request.value.as_ref())? }),
            _ => Ok(Action::Read),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Up { .. } => "up",
            Action::Down { .. } => "down",
            Action::Mute => "mute",
            Action::Set { .. } => "set",
        }
    }

    /// The one mutating call this action needs, if any.
    pub fn mutation(&self) -> Option<Mutation> {
        match *self {
            Action::Read => None,
            Action::Up { step } => Some(Mutation::SetVolume(VolumeChange::Relative(i64::from(step)))),
            Action::Down { step } => Some(Mutation::SetVolume(VolumeChange::Relative(-i64::from(step)))),
            Action::Mute => Some(Mutation::ToggleMute),
            Action::Set { level } => Some(Mutation::SetVolume(VolumeChange::Absolute(level))),
        }
    }
}

fn parse_step(step: Option<&Value>) -> Result<u32> {
    let invalid = || MixerError::InvalidAction("invalid step".to_string());

    let step = match step {
        None | Some(Value::Null) => return Ok(DEFAULT_STEP),
        Some(Value::Number(number)) => number.as_u64().ok_or_else(invalid)?,
        Some(Value::String(text)) => text.trim().parse::<u64>().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };

    if step > u64::from(MAX_LEVEL) {
        return Err(invalid());
    }
    Ok(step as u32)
}

/// Accepts `50`, `"50"` and `"50%"` alike.
fn parse_level(value: Option<&Value>) -> Result<u32> {
    let invalid = || MixerError::InvalidAction("invalid value".to_string());

    let level = match value {
        Some(Value::Number(number)) => number.as_u64().ok_or_else(invalid)?,
        Some(Value::String(text)) => {
            let text = text.trim();
            let digits = text.strip_suffix('%').unwrap_or(text);
            digits.parse::<u64>().map_err(|_| invalid())?
        }
        _ => return Err(invalid()),
    };

    if level > u64::from(MAX_LEVEL) {
        return Err(invalid());
    }
    Ok(level as u32)
}
