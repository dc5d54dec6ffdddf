//! Retry policy shared by the transport layer and the test-run poll loop.
//!
//! The async driver lives in `kata-utils`; this is only the policy so that
//! [`crate::Context`] can carry it without pulling in a runtime.

use std::time::Duration;

/// Default maximum number of attempts for a retryable operation
const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Default minimum wait between attempts
const DEFAULT_MIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Default cap on the exponential backoff
const DEFAULT_MAX_TIMEOUT: Duration = Duration::from_secs(8);

/// Configuration for bounded-retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts before giving up
    pub max_attempts: usize,
    /// Minimum wait before the next attempt
    pub min_timeout: Duration,
    /// Cap on the exponential backoff
    pub max_timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_timeout: DEFAULT_MIN_TIMEOUT,
            max_timeout: DEFAULT_MAX_TIMEOUT,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn new(max_attempts: usize, min_timeout: Duration) -> Self {
        Self {
            max_attempts,
            min_timeout,
            ..Self::default()
        }
    }

    /// Calculate the wait before the attempt after `attempt` (0-based),
    /// doubling from `min_timeout` up to `max_timeout`. No jitter: the
    /// remote rate limit rewards deterministic spacing.
    #[must_use]
    pub fn delay(&self, attempt: usize) -> Duration {
        let exponential = self
            .min_timeout
            .saturating_mul(2u32.saturating_pow(attempt.min(16) as u32));
        exponential.min(self.max_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_and_caps() {
        let config = RetryConfig {
            max_attempts: 5,
            min_timeout: Duration::from_millis(100),
            max_timeout: Duration::from_millis(350),
        };
        assert_eq!(config.delay(0), Duration::from_millis(100));
        assert_eq!(config.delay(1), Duration::from_millis(200));
        assert_eq!(config.delay(2), Duration::from_millis(350));
        assert_eq!(config.delay(10), Duration::from_millis(350));
    }
}
