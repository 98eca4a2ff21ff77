//! Retry with exponential backoff for generation calls
//!
//! Only backend failures (HTTP, upstream API) are retried. Configuration and
//! input errors fail on the first attempt.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::info;
use tracing::warn;

use super::GenerationParams;
use super::LlmResponse;
use super::TextGenerator;
use crate::config::LlmConfig;
use crate::errors::Result;
use crate::errors::SwaliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    /// 1s, 2s, 4s between three attempts
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(8))
    }
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            max_attempts: config.max_retries,
            ..Self::default()
        }
    }

    /// At least one attempt is always made
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Wait after the failed attempt number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `operation` until it succeeds, fails permanently or attempts run out
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("Succeeded after {} attempts", attempt);
                    }
                    return Ok(value);
                }
                Err(e) if !e.is_backend_error() => return Err(e),
                Err(e) if attempt >= max_attempts => {
                    warn!("Giving up after {} attempts: {}", attempt, e);
                    return Err(SwaliError::Llm(format!(
                        "failed after {attempt} attempts: {e}"
                    )));
                }
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        "Attempt {}/{} failed, retrying in {:?}: {}",
                        attempt, max_attempts, delay, e
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Generate with the given policy, surfacing the last error when all attempts fail
pub async fn generate_with_retry(
    generator: &dyn TextGenerator,
    prompt: &str,
    params: &GenerationParams,
    policy: &RetryPolicy,
) -> Result<LlmResponse> {
    policy
        .execute(|| generator.generate(prompt, params))
        .await
}
