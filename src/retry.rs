//! Bounded exponential backoff around external calls.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::GhError;

/// Retry budget for one external call.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_secs: u64,
    pub backoff_multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 2,
            backoff_multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Delay slept after the failed attempt with index `attempt` (0-based):
    /// `base_delay_secs * backoff_multiplier ^ attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.backoff_multiplier).saturating_pow(attempt);
        Duration::from_secs(self.base_delay_secs.saturating_mul(factor))
    }

    pub(crate) fn normalized(self) -> Self {
        Self {
            max_attempts: self.max_attempts.max(1),
            ..self
        }
    }
}

/// Runs an operation, retrying only [`FailureKind::Transient`] failures.
///
/// The backoff sleep holds up the caller; nothing else runs meanwhile.
///
/// [`FailureKind::Transient`]: crate::error::FailureKind::Transient
#[derive(Debug, Clone, Copy)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy: policy.normalized(),
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Execute `operation` up to `max_attempts` times.
    ///
    /// A fatal failure, or a transient one on the final attempt, is returned
    /// unchanged.
    pub async fn execute<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, GhError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GhError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(label, attempts = attempt + 1, "succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if err.is_transient() && attempt + 1 < self.policy.max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        label,
                        attempt = attempt + 1,
                        max_attempts = self.policy.max_attempts,
                        delay_secs = delay.as_secs(),
                        "rate limited, retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
