#![allow(dead_code)]

use async_trait::async_trait;
use email_summarizer::ai::{EngineRequest, LengthBounds, LengthPolicy, ShortInputPolicy};
use email_summarizer::ai::SummarizationEngine;
use email_summarizer::core::{AppState, SummarizationGateway};
use email_summarizer::errors::SummarizerError;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Engine double that records the bounds it was called with.
#[derive(Default)]
pub struct RecordingEngine {
    pub calls: Mutex<Vec<(String, LengthBounds)>>,
    pub fail: bool,
}

impl RecordingEngine {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn bounds(&self) -> Vec<LengthBounds> {
        self.calls.lock().unwrap().iter().map(|(_, b)| *b).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SummarizationEngine for RecordingEngine {
    async fn summarize(&self, request: EngineRequest<'_>) -> Result<String, SummarizerError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.text.to_string(), request.bounds));
        if self.fail {
            return Err(SummarizerError::EngineError("model crashed".to_string()));
        }
        Ok(format!(
            "summary({}..{})",
            request.bounds.min_length, request.bounds.max_length
        ))
    }

    fn backend(&self) -> &'static str {
        "recording"
    }

    fn model_id(&self) -> &str {
        "test/model"
    }
}

pub const TEST_BODY_LIMIT: usize = 16 * 1024;

pub fn state_with(engine: Arc<RecordingEngine>, policy: ShortInputPolicy) -> AppState {
    let gateway =
        SummarizationGateway::new(engine, LengthPolicy::new(policy), Duration::from_secs(5));
    AppState::new(gateway, TEST_BODY_LIMIT)
}

pub fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
}
