use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use types::AgentError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RetryClass {
    Retryable,
    Permanent,
}

// Network errors, timeouts, 5xx, 429 and 408 are worth another attempt.
// Anything else will fail the same way again.
pub fn classify(err: &AgentError) -> RetryClass {
    match err {
        AgentError::Transport { .. } | AgentError::Timeout { .. } => RetryClass::Retryable,
        AgentError::Status { status, .. } if is_transient_status(*status) => RetryClass::Retryable,
        AgentError::Status { .. } | AgentError::Decode(_) | AgentError::NoResponse(_) => {
            RetryClass::Permanent
        }
    }
}

pub fn is_transient_status(status: u16) -> bool {
    status >= 500 || status == 429 || status == 408
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Backoff {
    /// Total tries, the first one included. Zero behaves like one.
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub multiplier: u32,
    pub max_delay: Duration,
}

impl Backoff {
    pub fn next_delay(&self, delay: Duration) -> Duration {
        (delay * self.multiplier).min(self.max_delay)
    }
}

pub async fn retry_with_backoff<F, Fut, T>(
    mut operation: F,
    backoff: Backoff,
) -> Result<T, AgentError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AgentError>>,
{
    let mut delay = backoff.initial_delay.min(backoff.max_delay);
    let max_attempts = backoff.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_attempts && classify(&e) == RetryClass::Retryable => {
                tracing::warn!(
                    "Attempt {}/{} failed: {}. Retrying in {:?}...",
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                sleep(delay).await;
                delay = backoff.next_delay(delay);
            }
            Err(e) => return Err(e),
        }
    }

    unreachable!("the final attempt always returns")
}
