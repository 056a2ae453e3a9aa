use std::time::Duration;

use crate::error::ServiceError;

/// Bounded exponential backoff: attempt `n` (0-based) that fails transiently
/// waits `initial_delay * 2^n` before the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    pub fn start(&self) -> RetryState {
        RetryState {
            policy: *self,
            attempt: 0,
            last_error: None,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Progress of one `extract` call through its attempts.
#[derive(Debug)]
pub struct RetryState {
    policy: RetryPolicy,
    attempt: u32,
    last_error: Option<ServiceError>,
}

impl RetryState {
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }

    /// Records a failed attempt. Returns the delay to sleep before trying
    /// again, or `None` when the failure is final.
    pub fn record_failure(&mut self, error: ServiceError) -> Option<Duration> {
        let retry = error.is_transient() && self.attempt + 1 < self.policy.max_attempts;
        let delay = self.policy.delay_for(self.attempt);
        self.last_error = Some(error);

        if retry {
            self.attempt += 1;
            Some(delay)
        } else {
            None
        }
    }

    pub fn into_last_error(self) -> Option<ServiceError> {
        self.last_error
    }
}
