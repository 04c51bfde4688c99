//! The summarization engine seam.

use async_trait::async_trait;

use super::length_policy::LengthBounds;
use crate::errors::SummarizerError;

/// A single summarization call. Decoding is always deterministic (no sampling).
#[derive(Debug, Clone, Copy)]
pub struct EngineRequest<'a> {
    pub text: &'a str,
    pub bounds: LengthBounds,
}

/// An opaque pretrained summarizer.
///
/// Implementations are built once at startup and shared across requests, so
/// they must be safe to call concurrently.
#[async_trait]
pub trait SummarizationEngine: Send + Sync {
    /// # Errors
    ///
    /// Returns `SummarizerError::EngineError` or `SummarizerError::HttpError`
    /// when the engine cannot produce a summary.
    async fn summarize(&self, request: EngineRequest<'_>) -> Result<String, SummarizerError>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    fn model_id(&self) -> &str;
}
