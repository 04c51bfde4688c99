//! HTTP route handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::api::parsing::parse_summarize_request;
use crate::core::AppState;
use crate::core::models::{ErrorBody, HealthResponse, SummarizeResponse};
use crate::errors::SummarizerError;

impl IntoResponse for SummarizerError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// `POST /summarize`
pub async fn summarize_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SummarizeResponse>, SummarizerError> {
    let body = body.map_err(|rejection| {
        warn!("Failed to read request body: {}", rejection);
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            SummarizerError::PayloadTooLarge(rejection.body_text())
        } else {
            SummarizerError::BadRequest(rejection.body_text())
        }
    })?;

    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let request =
        parse_summarize_request(content_type, &body, state.max_body_bytes).inspect_err(|e| {
            warn!("Rejected summarize request: {}", e);
        })?;

    match state.gateway.summarize(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            if e.is_client_error() {
                warn!("Summarize request refused: {}", e);
            } else {
                error!("Failed to summarize email: {}", e);
            }
            Err(e)
        }
    }
}

/// `GET /health`
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.gateway.health())
}

pub async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Not found".to_string(),
        }),
    )
}
