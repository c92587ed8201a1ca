//! Exponential backoff with a cap.

use std::time::Duration;

/// Calculates the delay before the retry following `attempt_index`.
///
/// The first retry (attempt index 0) waits `base`; each subsequent retry
/// doubles the wait, capped at `max`. No jitter: the dashboard's callers are
/// individual users, not a fleet that could stampede in lockstep.
pub fn backoff_delay(attempt_index: u32, base: Duration, max: Duration) -> Duration {
    let factor = 2u32.saturating_pow(attempt_index);
    base.saturating_mul(factor).min(max)
}
