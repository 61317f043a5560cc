use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatementError {
    #[error("No input provided")]
    MissingInput,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Received an empty response from the AI.")]
    EmptyResponse,

    #[error("AI response was not in the expected CSV format.")]
    UnexpectedFormat,

    #[error("Gemini API Error (status {status}): {body}")]
    UpstreamApi { status: u16, body: String },

    #[error("Timed out after {0:?} waiting for the AI model.")]
    UpstreamTimeout(Duration),

    #[error("Failed to parse transactions. The AI model may be temporarily unavailable.")]
    ParseFailed,

    #[error("Backend returned status {status}: {message}")]
    Backend { status: u16, message: String },

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StatementError {
    /// Errors caused by the caller's payload rather than by anything downstream.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingInput | Self::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, StatementError>;
