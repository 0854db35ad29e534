/*!
 * Retry policy for remote calls.
 *
 * Both schedules are pure functions of the 1-based attempt number:
 * - timeout: `base_timeout * attempt` (1x, 2x, 3x, ...)
 * - backoff after a failed attempt: `backoff_base * 2^(attempt - 1)` (1s, 2s, 4s, ...)
 */

use std::time::Duration;

use crate::app_config::Config;

/// Per-chunk retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per chunk, at least 1
    pub max_attempts: u32,
    /// Timeout budget of the first attempt
    pub base_timeout: Duration,
    /// Delay after the first failed attempt
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_timeout: Duration::from_millis(240_000),
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            base_timeout: config.base_timeout(),
            backoff_base: config.retry_backoff(),
        }
    }

    /// Timeout budget of `attempt`
    pub fn timeout_for_attempt(&self, attempt: u32) -> Duration {
        self.base_timeout.saturating_mul(attempt.max(1))
    }

    /// Delay to wait after `attempt` failed
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.max(1) - 1;
        let factor = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }

    /// Whether another attempt may follow `attempt`
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
