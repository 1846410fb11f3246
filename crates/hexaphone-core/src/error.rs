use crate::timbre::Timbre;
use thiserror::Error;

/// Failures surfaced by the audio bridge to its caller.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio engine has not been started")]
    NotStarted,
    #[error("timbre not ready: samples for '{0}' have not been loaded")]
    TimbreNotReady(Timbre),
    #[error("audio engine failed to start: {0}")]
    StartFailed(String),
    #[error("loading samples for '{timbre}' failed: {reason}")]
    LoadFailed { timbre: Timbre, reason: String },
    #[error("audio engine error: {0}")]
    Engine(String),
}

/// A draw call the surface could not perform.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("surface error: {0}")]
pub struct SurfaceError(pub String);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unrecognised {kind}: '{input}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub input: String,
}

impl ParseError {
    pub fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.to_string(),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown config key '{0}'")]
    UnknownKey(String),
    #[error("invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },
}
