//! Lambda handler - thin router over the summarization gateway.
//!
//! This module handles:
//! - CORS preflight (`OPTIONS` on any path)
//! - Health checks (`GET /health`)
//! - Summaries (`POST /summarize`)

use super::{helpers, parsing};
use crate::core::AppState;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

pub use self::function_handler as handler;

/// Lambda handler for API Gateway proxy events.
///
/// # Errors
///
/// Never fails: every outcome, including engine failures, is reported as an
/// HTTP response payload.
#[tracing::instrument(level = "info", skip_all)]
pub async fn function_handler(state: &AppState, event: LambdaEvent<Value>) -> Result<Value, Error> {
    Ok(route_event(state, &event.payload).await)
}

/// Routes one proxy event payload to its response payload.
pub async fn route_event(state: &AppState, payload: &Value) -> Value {
    let method = parsing::event_method(payload).unwrap_or("POST");
    let Some(path) = parsing::event_path(payload) else {
        error!("Request missing path");
        return helpers::err_response(400, "Missing path");
    };
    info!(raw_path = %path, %method, "Request path");

    if method.eq_ignore_ascii_case("OPTIONS") {
        return helpers::preflight();
    }

    // ========================================================================
    // Health
    // ========================================================================

    if path.ends_with("/health") {
        if !method.eq_ignore_ascii_case("GET") {
            return helpers::err_response(405, "Method not allowed");
        }
        return helpers::ok_json(&state.gateway.health());
    }

    // ========================================================================
    // Summarize
    // ========================================================================

    if !path.ends_with("/summarize") {
        return helpers::err_response(404, "Not found");
    }

    if !method.eq_ignore_ascii_case("POST") {
        return helpers::err_response(405, "Method not allowed");
    }

    let body = match parsing::event_body(payload) {
        Ok(b) => b,
        Err(e) => {
            error!("Request body error: {}", e);
            return helpers::error_to_response(&e);
        }
    };

    let content_type = payload
        .get("headers")
        .and_then(|headers| parsing::get_header_value(headers, "Content-Type"));

    let request = match parsing::parse_summarize_request(content_type, &body, state.max_body_bytes)
    {
        Ok(r) => r,
        Err(e) => {
            warn!("Rejected summarize request: {}", e);
            return helpers::error_to_response(&e);
        }
    };

    match state.gateway.summarize(&request).await {
        Ok(response) => helpers::ok_json(&response),
        Err(e) => {
            if e.is_client_error() {
                warn!("Summarize request refused: {}", e);
            } else {
                error!("Failed to summarize email: {}", e);
            }
            helpers::error_to_response(&e)
        }
    }
}
