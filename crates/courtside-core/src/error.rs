// Error types shared by the engine.

use serde::Serialize;
use thiserror::Error;

/// The week payload lacks the scoreboard structure entirely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("payload is missing `{path}`")]
    MissingPath { path: String },
}

/// A historical period could not be obtained from the period source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("period {period} unavailable: {message}")]
pub struct FetchError {
    pub period: u32,
    pub message: String,
}

impl FetchError {
    pub fn new(period: u32, message: impl Into<String>) -> Self {
        FetchError {
            period,
            message: message.into(),
        }
    }
}

