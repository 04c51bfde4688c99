//! Configuration, request/response models and the summarization gateway

pub mod config;
pub mod models;
pub mod state;
pub mod summarize;

pub use state::AppState;
pub use summarize::SummarizationGateway;
