//! Summarization engines and the length budget applied to them

pub mod client;
pub mod engine;
pub mod huggingface;
pub mod length_policy;

use std::sync::Arc;

use crate::core::config::{AppConfig, EngineBackend};
use crate::errors::SummarizerError;

// Re-export main types for convenience
pub use client::LlmClient;
pub use engine::{EngineRequest, SummarizationEngine};
pub use huggingface::HuggingFaceClient;
pub use length_policy::{LengthBounds, LengthPlan, LengthPolicy, ShortInputPolicy};

/// Builds the engine selected by `config`. Called once per process.
///
/// # Errors
///
/// Returns an error if the backend is missing credentials or its HTTP client
/// cannot be built.
pub fn build_engine(config: &AppConfig) -> Result<Arc<dyn SummarizationEngine>, SummarizerError> {
    match config.backend {
        EngineBackend::HuggingFace => Ok(Arc::new(HuggingFaceClient::new(
            &config.inference_base_url,
            config.model_id.clone(),
            config.hf_api_token.clone(),
            config.engine_timeout,
        )?)),
        EngineBackend::OpenAi => {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                SummarizerError::ConfigError("OPENAI_API_KEY is not set".to_string())
            })?;
            Ok(Arc::new(LlmClient::new(
                &config.inference_base_url,
                api_key,
                config.openai_org_id.clone(),
                config.model_id.clone(),
                config.engine_timeout,
            )?))
        }
    }
}
