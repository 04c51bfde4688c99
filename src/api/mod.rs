//! API Gateway (Lambda) adapter and request parsing shared with the server

#[cfg(feature = "lambda")]
pub mod handler;
#[cfg(feature = "lambda")]
pub mod helpers;
pub mod parsing;

// Re-export the main handler for convenience
#[cfg(feature = "lambda")]
pub use handler::handler;
