use std::future::Future;
use std::time::Duration;

use crate::core::FeedError;

/// Specifies the backoff strategy for retrying failed operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backoff {
    /// Uses a fixed delay between retries.
    Fixed(Duration),
    /// Uses an exponential delay between retries.
    /// The delay after the n-th failed attempt is `multiplier * 2^(n-1)`, clamped to `[min, max]`.
    Exponential {
        /// Scale of the exponential curve.
        multiplier: Duration,
        /// The shortest wait between attempts.
        min: Duration,
        /// The longest wait between attempts.
        max: Duration,
    },
}

impl Backoff {
    /// The wait that follows the given failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed(d) => *d,
            Backoff::Exponential { multiplier, min, max } => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                multiplier.saturating_mul(factor).clamp(*min, (*max).max(*min))
            }
        }
    }
}

/// Configuration for the automatic retry mechanism.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Enables or disables the retry mechanism. When disabled every operation runs exactly once.
    pub enabled: bool,
    /// The total number of attempts, including the first one.
    pub max_attempts: u32,
    /// The backoff strategy to use between attempts.
    pub backoff: Backoff,
    /// Restricts status retries to these codes. `None` retries every non-success status.
    pub retry_on_status: Option<Vec<u16>>,
    /// Whether to retry on timeouts (HTTP request, page load, selector and DOM waits).
    pub retry_on_timeout: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            backoff: Backoff::Exponential {
                multiplier: Duration::from_secs(1),
                min: Duration::from_secs(2),
                max: Duration::from_secs(10),
            },
            retry_on_status: None,
            retry_on_timeout: true,
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Whether `err` is transient under this policy.
    pub fn should_retry(&self, err: &FeedError) -> bool {
        match err {
            FeedError::Http(e) if e.is_timeout() => self.retry_on_timeout,
            FeedError::Http(e) => e.status().is_none_or(|s| self.status_retryable(s.as_u16())),
            FeedError::Status { status, .. } => self.status_retryable(*status),
            FeedError::Timeout(_) => self.retry_on_timeout,
            FeedError::Automation(_) => true,
            FeedError::Url(_)
            | FeedError::Protocol(_)
            | FeedError::Parse(_)
            | FeedError::Config(_)
            | FeedError::Source { .. } => false,
        }
    }

    fn status_retryable(&self, status: u16) -> bool {
        self.retry_on_status
            .as_ref()
            .is_none_or(|codes| codes.contains(&status))
    }

    fn attempts(&self) -> u32 {
        if self.enabled { self.max_attempts.max(1) } else { 1 }
    }
}

/// Runs `op` under `cfg`, sleeping between attempts.
///
/// `op` receives the 1-based attempt number. The last error is returned unchanged
/// once the attempts are exhausted or a non-retryable error occurs.
///
/// # Errors
///
/// Returns the error from the final attempt.
pub async fn retry<T, F, Fut>(cfg: &RetryConfig, what: &str, mut op: F) -> Result<T, FeedError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FeedError>>,
{
    let attempts = cfg.attempts();
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(v) => return Ok(v),
            Err(e) if attempt < attempts && cfg.should_retry(&e) => {
                let delay = cfg.backoff.delay_for(attempt);
                tracing::warn!(
                    operation = what,
                    attempt,
                    max_attempts = attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "retrying after failure"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
