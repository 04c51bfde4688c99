use crate::ai::build_engine;
use crate::core::config::AppConfig;
use crate::core::summarize::SummarizationGateway;
use crate::errors::SummarizerError;

/// Per-process context handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub gateway: SummarizationGateway,
    pub max_body_bytes: usize,
}

impl AppState {
    #[must_use]
    pub fn new(gateway: SummarizationGateway, max_body_bytes: usize) -> Self {
        Self {
            gateway,
            max_body_bytes,
        }
    }

    /// Builds the engine once and wraps it in a gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured engine cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, SummarizerError> {
        let engine = build_engine(config)?;
        Ok(Self::new(
            SummarizationGateway::from_config(engine, config),
            config.max_body_bytes,
        ))
    }
}
