use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::GeminiConfig;
use crate::service::model_client::ModelClient;
use crate::service::retry_hint::{PleaseRetryIn, RetryHintExtractor};
use crate::types::ask::{AnswerResult, FailureResult};

/// One entry of the fallback order. Rank 0 is the preferred model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelAttempt<'a> {
    pub model: &'a str,
    pub rank: usize,
}

/// Ranked model fallback with at most one hinted retry per model.
///
/// Worst case latency is bounded by `order.len() * max_delay` plus the
/// remote calls themselves.
#[derive(Clone)]
pub struct FallbackPolicy {
    order: Vec<String>,
    max_delay: Duration,
    hints: Arc<dyn RetryHintExtractor>,
}

impl FallbackPolicy {
    pub fn new(order: Vec<String>, max_delay: Duration) -> Self {
        Self {
            order,
            max_delay,
            hints: Arc::new(PleaseRetryIn),
        }
    }

    pub fn from_config(cfg: &GeminiConfig) -> Self {
        Self::new(cfg.model_list.clone(), cfg.max_retry_delay())
    }

    pub fn with_extractor(mut self, hints: impl RetryHintExtractor + 'static) -> Self {
        self.hints = Arc::new(hints);
        self
    }

    pub fn attempts(&self) -> impl Iterator<Item = ModelAttempt<'_>> {
        self.order
            .iter()
            .enumerate()
            .map(|(rank, model)| ModelAttempt { model, rank })
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    fn hinted_delay(&self, message: &str) -> Option<f64> {
        self.hints
            .retry_after(message)
            .filter(|d| d.is_finite() && *d >= 0.0)
    }

    /// First success wins; lower-ranked models are only tried after every
    /// higher-ranked attempt (and its optional retry) has failed.
    pub async fn answer(
        &self,
        client: &dyn ModelClient,
        query: &str,
    ) -> Result<AnswerResult, FailureResult> {
        let mut last_error: Option<String> = None;

        for ModelAttempt { model, rank } in self.attempts() {
            let message = match client.generate(model, query).await {
                Ok(answer) => {
                    info!(model, rank, "model answered");
                    return Ok(AnswerResult {
                        answer,
                        model_used: model.to_string(),
                        retried_after_seconds: None,
                    });
                }
                Err(e) => e.to_string(),
            };
            warn!(model, rank, error = %message, "model attempt failed");

            let hint = self.hinted_delay(&message);
            last_error = Some(message);

            let Some(delay) = hint else {
                debug!(model, rank, "no retry hint; falling through");
                continue;
            };

            // Hints too large for a Duration still wait the cap.
            let wait = Duration::try_from_secs_f64(delay)
                .map_or(self.max_delay, |d| d.min(self.max_delay));
            info!(
                model,
                rank,
                suggested_secs = delay,
                wait_secs = wait.as_secs_f64(),
                "retrying after upstream hint"
            );
            tokio::time::sleep(wait).await;

            match client.generate(model, query).await {
                Ok(answer) => {
                    info!(model, rank, "model answered on retry");
                    return Ok(AnswerResult {
                        answer,
                        model_used: model.to_string(),
                        retried_after_seconds: Some(delay),
                    });
                }
                Err(e) => {
                    let message = e.to_string();
                    warn!(model, rank, error = %message, "retry failed; falling through");
                    last_error = Some(message);
                }
            }
        }

        let details = last_error.unwrap_or_else(|| "no models configured".to_string());
        warn!(error = %details, "all models failed");
        Err(FailureResult::exhausted(details))
    }
}
