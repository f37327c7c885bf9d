//! Per-error-class retry policy for ad-library requests.
//!
//! Each outbound request is wrapped in [`retry_per_class`], which retries
//! transient failures with a fixed delay bounded per error class:
//!
//! | Class                    | Delay | Max retries |
//! |--------------------------|-------|-------------|
//! | HTTP 429 (rate limited)  | 60 s  | 2           |
//! | HTTP 500/503 (transient) | 5 s   | 3           |
//!
//! HTTP 400/401/403 indicate misconfiguration, not transience, and are
//! returned immediately, as are network failures and parse errors.

use std::future::Future;
use std::time::Duration;

use crate::error::AdLibraryError;

/// Fixed backoff for one error class.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub max_retries: u32,
    pub delay: Duration,
}

/// Retry policy table, one [`Backoff`] per retriable error class.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub rate_limited: Backoff,
    pub server_error: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            rate_limited: Backoff {
                max_retries: 2,
                delay: Duration::from_secs(60),
            },
            server_error: Backoff {
                max_retries: 3,
                delay: Duration::from_secs(5),
            },
        }
    }
}

impl RetryPolicy {
    /// Backoff for `err`, or `None` when the error must not be retried.
    fn backoff_for(&self, err: &AdLibraryError) -> Option<Backoff> {
        match err {
            AdLibraryError::RateLimited => Some(self.rate_limited),
            AdLibraryError::ServerError { .. } => Some(self.server_error),
            AdLibraryError::Http(_)
            | AdLibraryError::Rejected { .. }
            | AdLibraryError::UnexpectedStatus { .. }
            | AdLibraryError::Deserialize { .. } => None,
        }
    }
}

/// Runs `operation`, retrying per the class table in `policy`.
///
/// Attempts are counted independently per class: a request that alternates
/// between 429 and 503 responses gets each class's full allowance, matching
/// a per-request (not per-run) policy.
pub(crate) async fn retry_per_class<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, AdLibraryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AdLibraryError>>,
{
    let mut rate_limited_attempts = 0u32;
    let mut server_error_attempts = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let Some(backoff) = policy.backoff_for(&err) else {
                    return Err(err);
                };
                let attempts = if matches!(err, AdLibraryError::RateLimited) {
                    &mut rate_limited_attempts
                } else {
                    &mut server_error_attempts
                };
                if *attempts >= backoff.max_retries {
                    return Err(err);
                }
                *attempts += 1;
                tracing::warn!(
                    attempt = *attempts,
                    max_retries = backoff.max_retries,
                    delay_secs = backoff.delay.as_secs(),
                    error = %err,
                    "transient ad-library error — retrying after fixed delay"
                );
                tokio::time::sleep(backoff.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn zero_delay_policy() -> RetryPolicy {
        RetryPolicy {
            rate_limited: Backoff {
                max_retries: 2,
                delay: Duration::ZERO,
            },
            server_error: Backoff {
                max_retries: 3,
                delay: Duration::ZERO,
            },
        }
    }

    fn rejected() -> AdLibraryError {
        AdLibraryError::Rejected {
            status: 401,
            message: "bad token".to_owned(),
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_per_class(&zero_delay_policy(), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, AdLibraryError>(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_errors_are_retried_then_succeed() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_per_class(&zero_delay_policy(), || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(AdLibraryError::ServerError { status: 503 })
                } else {
                    Ok(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn rate_limit_retries_exhaust_after_two() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_per_class(&zero_delay_policy(), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(AdLibraryError::RateLimited)
            }
        })
        .await;
        assert!(matches!(result, Err(AdLibraryError::RateLimited)));
        assert_eq!(
            calls.load(Ordering::SeqCst),
            3,
            "1 initial attempt + 2 retries"
        );
    }

    #[tokio::test]
    async fn server_error_retries_exhaust_after_three() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_per_class(&zero_delay_policy(), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(AdLibraryError::ServerError { status: 500 })
            }
        })
        .await;
        assert!(matches!(result, Err(AdLibraryError::ServerError { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 4, "1 initial + 3 retries");
    }

    #[tokio::test]
    async fn rejection_is_never_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_per_class(&zero_delay_policy(), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(rejected())
            }
        })
        .await;
        assert!(matches!(result, Err(AdLibraryError::Rejected { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn deserialize_errors_are_never_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_per_class(&zero_delay_policy(), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                let source = serde_json::from_str::<()>("nope").unwrap_err();
                Err::<u32, _>(AdLibraryError::Deserialize {
                    context: "test".to_owned(),
                    source,
                })
            }
        })
        .await;
        assert!(matches!(result, Err(AdLibraryError::Deserialize { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
