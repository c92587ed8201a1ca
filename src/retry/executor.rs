//! Retry Executor Module
//!
//! Wraps an asynchronous operation and retries it with capped exponential
//! backoff, consulting the classifier after every failure.
//!
//! # States
//! ```text
//! Attempting → Succeeded: operation returned a value
//! Attempting → Failed:    non-retryable kind, or attempts exhausted
//! Attempting → Waiting:   retryable kind with attempts left
//! Waiting → Attempting:   after min(base × 2^attempt_index, max)
//! ```
//!
//! Unauthorized and RateLimitExceeded fail immediately: neither resolves
//! within the lifetime of a single call. Every failure is logged before the
//! retry decision is made.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{RawFailure, Result};
use crate::retry::{backoff_delay, ErrorClassifier};

// == Defaults ==
/// Attempts made when the caller has no opinion.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(16);

// == Retry Executor ==
/// Executes async operations with classified-failure retry.
#[derive(Clone)]
pub struct RetryExecutor {
    /// Failure taxonomy source
    classifier: ErrorClassifier,
    /// Delay before the first retry
    base_delay: Duration,
    /// Upper bound on any single delay
    max_delay: Duration,
}

impl RetryExecutor {
    // == Constructor ==
    /// Creates an executor with the standard 1s base / 16s cap backoff.
    pub fn new(classifier: ErrorClassifier) -> Self {
        Self::with_delays(classifier, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY)
    }

    /// Creates an executor with explicit backoff bounds.
    pub fn with_delays(classifier: ErrorClassifier, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            classifier,
            base_delay,
            max_delay,
        }
    }

    // == Execute ==
    /// Runs the operation, retrying retryable failures up to `max_attempts`
    /// total attempts.
    ///
    /// On exhaustion, or on the first non-retryable failure, the final
    /// classified error is returned. `max_attempts` of zero is treated as
    /// one: the operation always runs at least once.
    ///
    /// The operation is a plain `FnMut` producing a fresh future per
    /// attempt; the executor neither inspects nor depends on the success
    /// payload. Dropping the returned future abandons the wait but cannot
    /// cancel an attempt beyond normal future-drop semantics.
    pub async fn execute<T, F, Fut>(&self, mut operation: F, max_attempts: u32) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, RawFailure>>,
    {
        let max_attempts = max_attempts.max(1);
        let mut attempt_index = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(raw) => {
                    let classified = self.classifier.classify(&raw);

                    // Report the failure before deciding what to do with it
                    warn!(
                        kind = %classified.kind,
                        attempt = attempt_index + 1,
                        max_attempts,
                        "guarded operation failed: {}",
                        classified.message
                    );

                    if !classified.kind.is_retryable() || attempt_index >= max_attempts - 1 {
                        return Err(classified);
                    }

                    let delay = backoff_delay(attempt_index, self.base_delay, self.max_delay);
                    debug!(delay_ms = delay.as_millis() as u64, "backing off before retry");
                    tokio::time::sleep(delay).await;

                    attempt_index += 1;
                }
            }
        }
    }
}
