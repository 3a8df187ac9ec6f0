//! Bounded retries for remote translation calls.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// How many times to try an operation and how long to wait in between.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, the first one included. Never less than 1.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Each retry waits this many times longer than the previous one
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_delay: Duration::from_secs(2),
            backoff_multiplier: 2.0,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Preset for translating one UI string: 2 attempts, 200ms apart.
    pub fn remote_translation() -> Self {
        Self::new(2, Duration::from_millis(200)).with_max_delay(Duration::from_millis(500))
    }

    pub fn single_attempt() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Wait before attempt `attempt` (0-indexed). The first attempt never waits.
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi((attempt - 1) as i32);
        Duration::from_millis(delay_ms as u64).min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::remote_translation()
    }
}

/// Run `operation` until it succeeds, fails with an error `should_retry`
/// rejects, or `config.max_attempts` is used up. The last error is returned.
pub async fn with_retry_if<T, E, F, Fut, P>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let delay = config.delay_for_attempt(attempt);
        if !delay.is_zero() {
            debug!(
                "{}: attempt {}/{} in {:?}",
                operation_name,
                attempt + 1,
                max_attempts,
                delay
            );
            sleep(delay).await;
        }

        let error = match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        if !should_retry(&error) {
            debug!("{}: giving up on permanent error: {}", operation_name, error);
            return Err(error);
        }

        attempt += 1;
        if attempt >= max_attempts {
            warn!(
                "{}: failed after {} attempts: {}",
                operation_name, max_attempts, error
            );
            return Err(error);
        }
        warn!(
            "{}: attempt {}/{} failed: {}",
            operation_name, attempt, max_attempts, error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::TranslationError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn unavailable() -> TranslationError {
        TranslationError::Status {
            status: 503,
            body: "busy".to_string(),
        }
    }

    fn fast(attempts: u32) -> RetryConfig {
        RetryConfig::new(attempts, Duration::from_millis(5))
    }

    #[test]
    fn test_remote_translation_preset() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        // Capped well below the per-attempt timeout
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        assert_eq!(RetryConfig::new(0, Duration::ZERO).max_attempts, 1);
        assert_eq!(RetryConfig::single_attempt().max_attempts, 1);
    }

    #[tokio::test]
    async fn test_transient_error_is_retried() {
        let calls = &AtomicU32::new(0);

        let result = with_retry_if(
            &fast(2),
            "Translation to hi",
            move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(unavailable())
                } else {
                    Ok("छात्र".to_string())
                }
            },
            TranslationError::is_retryable,
        )
        .await;

        assert_eq!(result, Ok("छात्र".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_error_fails_immediately() {
        let calls = &AtomicU32::new(0);

        let result: Result<String, _> = with_retry_if(
            &fast(3),
            "Translation to ta",
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TranslationError::Status {
                    status: 400,
                    body: "bad request".to_string(),
                })
            },
            TranslationError::is_retryable,
        )
        .await;

        assert!(matches!(result, Err(TranslationError::Status { status: 400, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_attempts_are_bounded() {
        let calls = &AtomicU32::new(0);

        let result: Result<String, _> = with_retry_if(
            &fast(2),
            "Translation to bn",
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(unavailable())
            },
            TranslationError::is_retryable,
        )
        .await;

        assert_eq!(result, Err(unavailable()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_single_attempt_never_retries() {
        let calls = &AtomicU32::new(0);

        let result: Result<String, _> = with_retry_if(
            &RetryConfig::single_attempt(),
            "Translation to mr",
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TranslationError::Timeout(Duration::from_secs(5)))
            },
            TranslationError::is_retryable,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
