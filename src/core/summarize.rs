//! The summarization gateway: normalizes the email, plans length bounds and
//! calls the engine.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::ai::engine::{EngineRequest, SummarizationEngine};
use crate::ai::length_policy::{LengthPlan, LengthPolicy};
use crate::core::config::AppConfig;
use crate::core::models::{HealthResponse, SummarizeRequest, SummarizeResponse};
use crate::errors::SummarizerError;
use crate::utils::email_text::normalize_email_body;

/// Shared, cheaply cloneable handle over the process-wide engine.
#[derive(Clone)]
pub struct SummarizationGateway {
    engine: Arc<dyn SummarizationEngine>,
    policy: LengthPolicy,
    engine_timeout: Duration,
    inference_slots: Option<Arc<Semaphore>>,
}

impl SummarizationGateway {
    #[must_use]
    pub fn new(
        engine: Arc<dyn SummarizationEngine>,
        policy: LengthPolicy,
        engine_timeout: Duration,
    ) -> Self {
        Self {
            engine,
            policy,
            engine_timeout,
            inference_slots: None,
        }
    }

    /// Caps the number of engine calls in flight. `1` serializes inference.
    #[must_use]
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.inference_slots = Some(Arc::new(Semaphore::new(limit.max(1))));
        self
    }

    #[must_use]
    pub fn from_config(engine: Arc<dyn SummarizationEngine>, config: &AppConfig) -> Self {
        let gateway = Self::new(
            engine,
            LengthPolicy::new(config.short_input_policy),
            config.engine_timeout,
        );
        match config.inference_concurrency {
            Some(limit) => gateway.with_concurrency_limit(limit),
            None => gateway,
        }
    }

    #[must_use]
    pub fn policy(&self) -> LengthPolicy {
        self.policy
    }

    #[must_use]
    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok".to_string(),
            backend: self.engine.backend().to_string(),
            model: self.engine.model_id().to_string(),
        }
    }

    /// Summarizes one email.
    ///
    /// # Errors
    ///
    /// Returns `InputTooShort` when the short-input policy rejects the email,
    /// `EngineTimeout` when the wait for an inference slot plus the engine call
    /// exceeds the deadline, and the engine's own error otherwise.
    #[tracing::instrument(level = "info", skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
    pub async fn summarize(
        &self,
        request: &SummarizeRequest,
    ) -> Result<SummarizeResponse, SummarizerError> {
        let text = normalize_email_body(request.email_body());
        let plan = self.policy.plan(&text);

        let bounds = match plan {
            LengthPlan::Summarize(bounds) => bounds,
            LengthPlan::Passthrough { word_count } => {
                info!(
                    word_count,
                    policy = %self.policy.short_input(),
                    "Input below summary budget, returning it unchanged"
                );
                return Ok(SummarizeResponse { summary: text });
            }
            LengthPlan::TooShort {
                word_count,
                minimum_words,
            } => {
                info!(word_count, minimum_words, "Rejecting input below summary budget");
                return Err(SummarizerError::InputTooShort {
                    word_count,
                    minimum_words,
                });
            }
        };

        info!(
            min_length = bounds.min_length,
            max_length = bounds.max_length,
            backend = self.engine.backend(),
            "Summarizing email"
        );

        let started = Instant::now();
        let engine_request = EngineRequest {
            text: &text,
            bounds,
        };
        // The deadline covers the wait for an inference slot as well as the call.
        let summary =
            match tokio::time::timeout(self.engine_timeout, self.call_engine(engine_request)).await
            {
                Ok(result) => result?,
                Err(_) => {
                    warn!(timeout = ?self.engine_timeout, "Summarization engine timed out");
                    return Err(SummarizerError::EngineTimeout(self.engine_timeout));
                }
            };

        info!(
            elapsed_ms = started.elapsed().as_millis(),
            summary_chars = summary.chars().count(),
            "Summary generated"
        );

        Ok(SummarizeResponse { summary })
    }

    async fn call_engine(&self, request: EngineRequest<'_>) -> Result<String, SummarizerError> {
        let _permit = match &self.inference_slots {
            Some(slots) => Some(slots.clone().acquire_owned().await.map_err(|e| {
                SummarizerError::EngineError(format!("Inference slots closed: {e}"))
            })?),
            None => None,
        };
        self.engine.summarize(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::length_policy::{LengthBounds, ShortInputPolicy};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeEngine {
        calls: Mutex<Vec<LengthBounds>>,
        delay: Option<Duration>,
        fail: bool,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl SummarizationEngine for FakeEngine {
        async fn summarize(
            &self,
            request: EngineRequest<'_>,
        ) -> Result<String, SummarizerError> {
            self.calls.lock().unwrap().push(request.bounds);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.fail {
                return Err(SummarizerError::EngineError("boom".to_string()));
            }
            Ok(format!("summary of {} words", request.text.split_whitespace().count()))
        }

        fn backend(&self) -> &'static str {
            "fake"
        }

        fn model_id(&self) -> &str {
            "fake-model"
        }
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn gateway(engine: Arc<FakeEngine>, policy: ShortInputPolicy) -> SummarizationGateway {
        SummarizationGateway::new(engine, LengthPolicy::new(policy), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn long_email_calls_engine_with_ceiling() {
        let engine = Arc::new(FakeEngine::default());
        let gw = gateway(engine.clone(), ShortInputPolicy::Passthrough);

        let response = gw.summarize(&SummarizeRequest::new(words(200))).await.unwrap();

        assert_eq!(response.summary, "summary of 200 words");
        assert_eq!(
            *engine.calls.lock().unwrap(),
            vec![LengthBounds {
                min_length: 30,
                max_length: 130
            }]
        );
    }

    #[tokio::test]
    async fn fifty_words_use_forty_token_budget() {
        let engine = Arc::new(FakeEngine::default());
        let gw = gateway(engine.clone(), ShortInputPolicy::Reject);

        gw.summarize(&SummarizeRequest::new(words(50))).await.unwrap();

        assert_eq!(
            *engine.calls.lock().unwrap(),
            vec![LengthBounds {
                min_length: 30,
                max_length: 40
            }]
        );
    }

    #[tokio::test]
    async fn short_email_passthrough_skips_engine() {
        let engine = Arc::new(FakeEngine::default());
        let gw = gateway(engine.clone(), ShortInputPolicy::Passthrough);
        let body = words(20);

        let response = gw.summarize(&SummarizeRequest::new(body.clone())).await.unwrap();

        assert_eq!(response.summary, body);
        assert!(engine.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn short_email_clamp_calls_engine_with_equal_bounds() {
        let engine = Arc::new(FakeEngine::default());
        let gw = gateway(engine.clone(), ShortInputPolicy::Clamp);

        gw.summarize(&SummarizeRequest::new(words(20))).await.unwrap();

        assert_eq!(
            *engine.calls.lock().unwrap(),
            vec![LengthBounds {
                min_length: 30,
                max_length: 30
            }]
        );
    }

    #[tokio::test]
    async fn short_email_reject_is_a_client_error() {
        let engine = Arc::new(FakeEngine::default());
        let gw = gateway(engine.clone(), ShortInputPolicy::Reject);

        let err = gw
            .summarize(&SummarizeRequest::new(words(20)))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SummarizerError::InputTooShort {
                word_count: 20,
                minimum_words: 38
            }
        ));
        assert_eq!(err.status_code(), 400);
        assert!(engine.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_body_never_reaches_engine() {
        for policy in [ShortInputPolicy::Passthrough, ShortInputPolicy::Clamp] {
            let engine = Arc::new(FakeEngine::default());
            let gw = gateway(engine.clone(), policy);

            let response = gw.summarize(&SummarizeRequest::default()).await.unwrap();

            assert_eq!(response.summary, "");
            assert!(engine.calls.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn engine_failure_propagates_as_server_error() {
        let engine = Arc::new(FakeEngine {
            fail: true,
            ..FakeEngine::default()
        });
        let gw = gateway(engine, ShortInputPolicy::Passthrough);

        let err = gw
            .summarize(&SummarizeRequest::new(words(60)))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn slow_engine_times_out() {
        let engine = Arc::new(FakeEngine {
            delay: Some(Duration::from_millis(200)),
            ..FakeEngine::default()
        });
        let gw = SummarizationGateway::new(
            engine,
            LengthPolicy::default(),
            Duration::from_millis(20),
        );

        let err = gw
            .summarize(&SummarizeRequest::new(words(60)))
            .await
            .unwrap_err();

        assert!(matches!(err, SummarizerError::EngineTimeout(_)));
        assert_eq!(err.status_code(), 504);
    }

    #[tokio::test]
    async fn concurrency_limit_serializes_engine_calls() {
        let engine = Arc::new(FakeEngine {
            delay: Some(Duration::from_millis(20)),
            ..FakeEngine::default()
        });
        let gw = gateway(engine.clone(), ShortInputPolicy::Passthrough).with_concurrency_limit(1);

        let request = SummarizeRequest::new(words(60));
        let (a, b, c) = tokio::join!(
            gw.summarize(&request),
            gw.summarize(&request),
            gw.summarize(&request)
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(engine.calls.lock().unwrap().len(), 3);
        assert_eq!(engine.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn queued_requests_share_the_engine_deadline() {
        let engine = Arc::new(FakeEngine {
            delay: Some(Duration::from_millis(80)),
            ..FakeEngine::default()
        });
        let gw = SummarizationGateway::new(
            engine,
            LengthPolicy::default(),
            Duration::from_millis(100),
        )
        .with_concurrency_limit(1);

        let request = SummarizeRequest::new(words(60));
        let started = Instant::now();
        let results = tokio::join!(
            gw.summarize(&request),
            gw.summarize(&request),
            gw.summarize(&request),
            gw.summarize(&request),
            gw.summarize(&request)
        );
        let elapsed = started.elapsed();

        let results = [results.0, results.1, results.2, results.3, results.4];
        assert!(results.iter().any(Result::is_ok));
        assert!(results.iter().all(|r| match r {
            Ok(_) => true,
            Err(e) => matches!(e, SummarizerError::EngineTimeout(_)),
        }));
        assert!(elapsed < Duration::from_millis(250), "took {elapsed:?}");
    }

    #[tokio::test]
    async fn repeated_requests_use_identical_bounds() {
        let engine = Arc::new(FakeEngine::default());
        let gw = gateway(engine.clone(), ShortInputPolicy::Passthrough);
        let request = SummarizeRequest::new(words(91));

        let first = gw.summarize(&request).await.unwrap();
        let second = gw.summarize(&request).await.unwrap();

        assert_eq!(first, second);
        let calls = engine.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[test]
    fn health_reports_engine_identity() {
        let gw = gateway(Arc::new(FakeEngine::default()), ShortInputPolicy::Passthrough);
        let health = gw.health();
        assert_eq!(health.status, "ok");
        assert_eq!(health.backend, "fake");
        assert_eq!(health.model, "fake-model");
    }
}
