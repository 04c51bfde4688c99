use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Request body must be JSON: {0}")]
    UnsupportedMediaType(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Input too short to summarize: {word_count} words, at least {minimum_words} required")]
    InputTooShort {
        word_count: usize,
        minimum_words: usize,
    },

    #[error("Summarization engine failed: {0}")]
    EngineError(String),

    #[error("Summarization engine timed out after {0:?}")]
    EngineTimeout(Duration),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl SummarizerError {
    /// HTTP status the error is reported with. Caller faults are 4xx, engine
    /// and internal faults are 5xx.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            SummarizerError::BadRequest(_) | SummarizerError::InputTooShort { .. } => 400,
            SummarizerError::PayloadTooLarge(_) => 413,
            SummarizerError::UnsupportedMediaType(_) => 415,
            SummarizerError::EngineTimeout(_) => 504,
            SummarizerError::EngineError(_)
            | SummarizerError::HttpError(_)
            | SummarizerError::ConfigError(_) => 500,
        }
    }

    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

impl From<reqwest::Error> for SummarizerError {
    fn from(error: reqwest::Error) -> Self {
        SummarizerError::HttpError(error.to_string())
    }
}

impl From<anyhow::Error> for SummarizerError {
    fn from(error: anyhow::Error) -> Self {
        SummarizerError::EngineError(error.to_string())
    }
}
