//! Email Summarizer - an HTTP gateway that condenses email bodies with a
//! pretrained summarization model.
//!
//! Each request's summary length is budgeted from the email's word count
//! (`min(130, floor(words * 0.8))`, never below 30) and handed to a hosted
//! inference backend with deterministic decoding.
//!
//! # Architecture
//!
//! The system uses:
//! - axum for the standalone HTTP server, or AWS Lambda behind API Gateway
//! - reqwest for the Hugging Face and `OpenAI` inference backends
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```no_run
//! use email_summarizer::core::AppState;
//! use email_summarizer::core::config::AppConfig;
//! use email_summarizer::core::models::SummarizeRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Set up structured logging
//!     email_summarizer::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let state = AppState::from_config(&config)?;
//!
//!     let response = state
//!         .gateway
//!         .summarize(&SummarizeRequest::new("Hi team, the launch moved to Friday..."))
//!         .await?;
//!     println!("Summary: {}", response.summary);
//!
//!     Ok(())
//! }
//! ```
// Module declarations
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod server;
pub mod utils;

pub use errors::SummarizerError;

/// Configure structured logging with JSON format.
///
/// Log levels come from `RUST_LOG` (default `info`). The JSON formatter suits
/// `CloudWatch` Logs when running under Lambda and log shippers elsewhere.
/// Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// // Initialize structured logging at process start
/// email_summarizer::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
