use std::time::Duration;

use crate::{error::ApiError, ErrorKind};

/// Classifies a failure as worth another attempt.
pub type RetryPredicate = fn(&ApiError) -> bool;

/// Retry behavior held by a client for its whole lifetime.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Growth factor applied per retry.
    pub multiplier: u32,
    /// Decides which failures are retried.
    pub retry_on: RetryPredicate,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1_000,
            multiplier: 2,
            retry_on: is_retryable,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay inserted before retry number `attempt + 1`.
    ///
    /// `attempt` is the zero-based index of the attempt that just failed, so
    /// the schedule is `base, base*m, base*m^2, ...`.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exp = attempt.min(16) as u32;
        let factor = u64::from(self.multiplier).saturating_pow(exp);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }

    /// Whether `err`, raised by zero-based attempt `attempt`, gets another try.
    pub fn should_retry(&self, err: &ApiError, attempt: usize) -> bool {
        attempt < self.max_retries && (self.retry_on)(err)
    }

    /// Upper bound of the cumulative backoff when every retry is spent.
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_retries).map(|attempt| self.delay_for(attempt)).sum()
    }
}

/// Default retry predicate.
///
/// Server errors (5xx) and network failures without a response are retried.
/// Client errors, validation failures, cancellation and unclassified errors
/// are terminal.
pub fn is_retryable(err: &ApiError) -> bool {
    matches!(err.kind(), ErrorKind::Server | ErrorKind::Network)
}
