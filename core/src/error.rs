use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Grid side must be at least 1")]
    InvalidSide,
    #[error("Tick interval must be at least 1 ms")]
    InvalidInterval,
    #[error("Display probability must be within (0, 100]")]
    InvalidProbability,
    #[error("Unknown configuration field: {0}")]
    UnknownField(String),
    #[error("Malformed value for configuration field: {0}")]
    MalformedField(&'static str),
    #[error("Missing configuration field: {0}")]
    MissingField(&'static str),
}

pub type Result<T> = core::result::Result<T, GameError>;
