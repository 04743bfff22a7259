//! Bounded exponential backoff for completion calls that never reach the provider.

use std::time::{Duration, SystemTime};

use reqwest_middleware::Error as MiddlewareError;
use reqwest_retry::{default_on_request_failure, RetryDecision, RetryPolicy, Retryable, RetryableStrategy};

/// Exponential backoff retry policy.
///
/// Delays double from `base_delay` on every attempt and are capped at `max_delay`.
pub struct TransportRetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl TransportRetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Sum of every delay slept between attempts when all retries are used.
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_retries)
            .map(|n_attempts| self.exponential_delay(n_attempts))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    fn exponential_delay(&self, n_attempts: u32) -> Duration {
        let delay = self.base_delay.as_secs_f64() * 2_f64.powi(n_attempts as i32);
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }
}

impl RetryPolicy for TransportRetryPolicy {
    fn should_retry(&self, _request_start_time: SystemTime, n_past_retries: u32) -> RetryDecision {
        if n_past_retries >= self.max_retries {
            RetryDecision::DoNotRetry
        } else {
            RetryDecision::Retry {
                execute_after: SystemTime::now() + self.exponential_delay(n_past_retries),
            }
        }
    }
}

/// Retries connect, timeout and body-read failures only.
///
/// Any HTTP answer, including 429 and 5xx, is handed back to the caller untouched: a
/// provider that answered has already consumed the request.
pub struct TransportFailuresOnly;

impl RetryableStrategy for TransportFailuresOnly {
    fn handle(&self, res: &Result<reqwest::Response, MiddlewareError>) -> Option<Retryable> {
        match res {
            Ok(_) => None,
            Err(error) => default_on_request_failure(error),
        }
    }
}
