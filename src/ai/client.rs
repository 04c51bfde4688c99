//! `OpenAI` Responses API client
//!
//! Generates email summaries with a chat model, steering length through the
//! instructions and capping it with `max_output_tokens`.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::engine::{EngineRequest, SummarizationEngine};
use super::length_policy::LengthBounds;
use crate::errors::SummarizerError;

/// Output tokens allowed per requested word; keeps the cap from cutting a
/// sentence short at the upper bound.
const OUTPUT_TOKENS_PER_WORD: u32 = 2;

/// LLM API client for generating summaries
pub struct LlmClient {
    http: Client,
    endpoint: String,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        api_key: String,
        org_id: Option<String>,
        model_name: String,
        timeout: Duration,
    ) -> Result<Self, SummarizerError> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            SummarizerError::HttpError(format!("Failed to build OpenAI HTTP client: {e}"))
        })?;

        Ok(Self {
            http,
            endpoint: format!("{}/responses", base_url.trim_end_matches('/')),
            api_key,
            org_id,
            model_name,
        })
    }

    #[must_use]
    pub fn build_instructions(bounds: LengthBounds) -> String {
        format!(
            "You summarise emails. Write a single plain-text summary of the email the user \
             provides, between {} and {} words long. Keep names, dates, amounts and requested \
             actions. Output ONLY the summary, with no preamble or commentary.",
            bounds.min_length, bounds.max_length
        )
    }

    #[must_use]
    pub fn build_request_body(&self, request: &EngineRequest<'_>) -> Value {
        json!({
            "model": self.model_name,
            "instructions": Self::build_instructions(request.bounds),
            "input": [
                {
                    "role": "user",
                    "content": [{ "type": "input_text", "text": request.text }]
                }
            ],
            "temperature": 0,
            "max_output_tokens": request.bounds.max_length.saturating_mul(OUTPUT_TOKENS_PER_WORD)
        })
    }

    fn headers(&self) -> Result<reqwest::header::HeaderMap, SummarizerError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let auth_value = format!("Bearer {}", self.api_key)
            .parse()
            .map_err(|e| SummarizerError::HttpError(format!("Invalid Authorization header: {e}")))?;
        headers.insert("Authorization", auth_value);

        if let Some(org) = &self.org_id {
            let org_value = org.parse().map_err(|e| {
                SummarizerError::HttpError(format!("Invalid OpenAI-Organization header: {e}"))
            })?;
            headers.insert("OpenAI-Organization", org_value);
        }

        Ok(headers)
    }
}

/// Reads the generated text from a Responses API payload: the `output_text`
/// convenience field when present, otherwise every `output_text` content part
/// joined by newlines.
#[must_use]
pub fn extract_output_text(response_json: &Value) -> Option<String> {
    if let Some(text) = response_json.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let mut collected: Vec<String> = Vec::new();
    if let Some(items) = response_json.get("output").and_then(|o| o.as_array()) {
        for item in items {
            if let Some(parts) = item.get("content").and_then(|c| c.as_array()) {
                for p in parts {
                    let is_output_text = p
                        .get("type")
                        .and_then(|t| t.as_str())
                        .is_some_and(|t| t == "output_text");
                    if !is_output_text {
                        continue;
                    }
                    if let Some(s) = p.get("text").and_then(|t| t.as_str()) {
                        collected.push(s.to_string());
                    } else if let Some(s) = p
                        .get("text")
                        .and_then(|t| t.get("value"))
                        .and_then(|v| v.as_str())
                    {
                        collected.push(s.to_string());
                    }
                }
            }
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

#[async_trait]
impl SummarizationEngine for LlmClient {
    async fn summarize(&self, request: EngineRequest<'_>) -> Result<String, SummarizerError> {
        #[cfg(feature = "debug-logs")]
        info!("Using OpenAI summary input:\n{}", request.text);

        info!(
            model = %self.model_name,
            min_length = request.bounds.min_length,
            max_length = request.bounds.max_length,
            "Requesting summary from OpenAI"
        );

        let started = Instant::now();
        let response = self
            .http
            .post(&self.endpoint)
            .headers(self.headers()?)
            .json(&self.build_request_body(&request))
            .send()
            .await
            .map_err(|e| SummarizerError::HttpError(format!("OpenAI API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(SummarizerError::EngineError(format!(
                "OpenAI API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            SummarizerError::EngineError(format!("Failed to parse OpenAI response: {e}"))
        })?;
        debug!(elapsed_ms = started.elapsed().as_millis(), "OpenAI responded");

        let text = extract_output_text(&response_json)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        text.ok_or_else(|| SummarizerError::EngineError("No text in response".to_string()))
    }

    fn backend(&self) -> &'static str {
        "openai"
    }

    fn model_id(&self) -> &str {
        &self.model_name
    }
}
