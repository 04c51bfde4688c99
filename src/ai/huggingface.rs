//! Hugging Face inference client for seq2seq summarization models
//! (BART, PEGASUS, T5 and friends).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::engine::{EngineRequest, SummarizationEngine};
use crate::errors::SummarizerError;

pub struct HuggingFaceClient {
    http: Client,
    endpoint: String,
    api_token: Option<String>,
    model_id: String,
}

impl HuggingFaceClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        model_id: String,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SummarizerError> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            SummarizerError::HttpError(format!("Failed to build inference HTTP client: {e}"))
        })?;

        Ok(Self {
            http,
            endpoint: format!("{}/models/{}", base_url.trim_end_matches('/'), model_id),
            api_token,
            model_id,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[must_use]
pub fn build_request_body(request: &EngineRequest<'_>) -> Value {
    json!({
        "inputs": request.text,
        "parameters": {
            "min_length": request.bounds.min_length,
            "max_length": request.bounds.max_length,
            "do_sample": false
        },
        "options": {
            "wait_for_model": true
        }
    })
}

/// Pulls the summary out of a pipeline response. Accepts the list form
/// (`[{"summary_text": ..}]`), a bare object, and `generated_text` as
/// served by text2text deployments.
#[must_use]
pub fn extract_summary(response: &Value) -> Option<String> {
    let first = match response {
        Value::Array(items) => items.first()?,
        other => other,
    };

    first
        .get("summary_text")
        .or_else(|| first.get("generated_text"))
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
}

fn extract_error(response: &Value) -> Option<String> {
    match response.get("error")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; "),
        ),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl SummarizationEngine for HuggingFaceClient {
    async fn summarize(&self, request: EngineRequest<'_>) -> Result<String, SummarizerError> {
        info!(
            model = %self.model_id,
            min_length = request.bounds.min_length,
            max_length = request.bounds.max_length,
            "Requesting summary from Hugging Face inference"
        );

        let mut builder = self
            .http
            .post(&self.endpoint)
            .json(&build_request_body(&request));
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| SummarizerError::HttpError(format!("Inference request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            SummarizerError::HttpError(format!(
                "Failed to read inference response body (status {status}): {e}"
            ))
        })?;
        debug!(elapsed_ms = started.elapsed().as_millis(), %status, "Inference responded");

        let parsed: Option<Value> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let detail = parsed
                .as_ref()
                .and_then(extract_error)
                .unwrap_or(body);
            return Err(SummarizerError::EngineError(format!(
                "Inference API error (status {status}): {detail}"
            )));
        }

        let parsed = parsed.ok_or_else(|| {
            SummarizerError::EngineError("Failed to parse inference response as JSON".to_string())
        })?;

        if let Some(err) = extract_error(&parsed) {
            return Err(SummarizerError::EngineError(format!(
                "Inference API error: {err}"
            )));
        }

        match extract_summary(&parsed) {
            Some(summary) if !summary.is_empty() => Ok(summary),
            Some(_) => Err(SummarizerError::EngineError(
                "Empty summary in response".to_string(),
            )),
            None => Err(SummarizerError::EngineError(
                "No summary_text in response".to_string(),
            )),
        }
    }

    fn backend(&self) -> &'static str {
        "huggingface"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
