use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

/// Exponential backoff for calls against a remote API.
///
/// Only errors marked retryable get another attempt; validation and
/// payload errors fail identically every time and return immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, multiplier: u32) -> Self {
        Self {
            max_attempts,
            base_delay,
            multiplier,
        }
    }

    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut delay = self.base_delay;
        let mut attempt = 1u32;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    tracing::warn!(
                        "Attempt {}/{} failed: {}; retrying in {:?}",
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= self.multiplier;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1), 2)
    }

    #[tokio::test]
    async fn succeeds_first_try() {
        let calls = AtomicU32::new(0);
        let result = policy()
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(7) }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = policy()
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(AppError::Upstream("429".to_string()))
                    } else {
                        Ok("audio")
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), "audio");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = policy()
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::Upstream("down".to_string())) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_errors_fail_fast() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = policy()
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::BadRequest("empty text".to_string())) }
            })
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
