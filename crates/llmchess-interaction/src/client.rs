//! Completion Client: throttling, retries and token accounting
//! around a [`CompletionService`].

use llmchess_core::{ChessError, ConversationMessage, Result, TokenUsage};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::completion::{CompletionRequest, CompletionService};

/// Delay before the `attempt`-th retry (1-based) of a failed or empty response.
pub trait BackoffPolicy: Send + Sync {
    fn delay(&self, attempt: u32) -> Duration;
}

/// Retry immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackoff;

impl BackoffPolicy for NoBackoff {
    fn delay(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}

/// `base * 2^(attempt-1)`, capped at `max`.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialBackoff {
    pub base: Duration,
    pub max: Duration,
}

impl ExponentialBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }
}

impl BackoffPolicy for ExponentialBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base.saturating_mul(factor).min(self.max)
    }
}

/// Mutable per-game state of the client, owned by the game loop.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    usage: TokenUsage,
    last_call: Option<Instant>,
    calls: u64,
}

impl ClientContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token totals over every successful call so far.
    pub fn usage(&self) -> TokenUsage {
        self.usage
    }

    /// Requests sent, including empty-choice retries.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

pub struct CompletionClient {
    service: Arc<dyn CompletionService>,
    min_delay: Duration,
    max_empty_retries: u32,
    max_service_retries: u32,
    backoff: Box<dyn BackoffPolicy>,
}

impl CompletionClient {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self {
            service,
            min_delay: Duration::ZERO,
            max_empty_retries: llmchess_core::config::DEFAULT_MAX_EMPTY_RETRIES,
            max_service_retries: llmchess_core::config::DEFAULT_MAX_SERVICE_RETRIES,
            backoff: Box::new(NoBackoff),
        }
    }

    /// Minimum spacing between consecutive requests.
    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }

    pub fn with_max_empty_retries(mut self, retries: u32) -> Self {
        self.max_empty_retries = retries;
        self
    }

    pub fn with_max_service_retries(mut self, retries: u32) -> Self {
        self.max_service_retries = retries;
        self
    }

    /// Delay between retries when the server does not say how long to wait.
    pub fn with_backoff(mut self, backoff: impl BackoffPolicy + 'static) -> Self {
        self.backoff = Box::new(backoff);
        self
    }

    /// Sends `messages` to `model` and returns the first choice's text.
    ///
    /// An empty choice set is retried with the same input up to
    /// `max_empty_retries` times. Retryable service errors (rate limits,
    /// server errors, dropped connections) are retried up to
    /// `max_service_retries` times, waiting for the server's `Retry-After`
    /// when it sent one. Every other error propagates unchanged.
    pub async fn chat(
        &self,
        context: &mut ClientContext,
        messages: &[ConversationMessage],
        model: &str,
    ) -> Result<String> {
        let request = CompletionRequest::new(model, messages);
        let mut empty_replies = 0u32;
        let mut service_retries = 0u32;

        loop {
            self.throttle(context).await;
            context.calls += 1;
            let response = self.service.complete(&request).await;
            context.last_call = Some(Instant::now());

            let response = match response {
                Ok(response) => response,
                Err(err) if err.is_retryable() && service_retries < self.max_service_retries => {
                    service_retries += 1;
                    let delay = err
                        .retry_after()
                        .unwrap_or_else(|| self.backoff.delay(service_retries));
                    tracing::warn!(
                        model,
                        attempt = service_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "completion request failed, retrying"
                    );
                    sleep_for(delay).await;
                    continue;
                }
                Err(err) => return Err(err),
            };

            if let Some(content) = response.content {
                context.usage += response.usage;
                tracing::debug!(
                    model,
                    input_tokens = response.usage.input,
                    output_tokens = response.usage.output,
                    "completion received"
                );
                return Ok(content);
            }

            empty_replies += 1;
            if empty_replies > self.max_empty_retries {
                return Err(ChessError::EmptyResponse {
                    attempts: empty_replies,
                });
            }
            tracing::warn!(model, attempt = empty_replies, "completion returned no choices, retrying");
            sleep_for(self.backoff.delay(empty_replies)).await;
        }
    }

    async fn throttle(&self, context: &ClientContext) {
        if self.min_delay.is_zero() {
            return;
        }
        if let Some(last) = context.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                tokio::time::sleep(self.min_delay - elapsed).await;
            }
        }
    }
}

async fn sleep_for(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
