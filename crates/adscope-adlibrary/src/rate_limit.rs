//! Outbound rate limiting for the ad-library API.
//!
//! Two independent constraints are enforced simultaneously: an hourly
//! request cap on a rolling window, and a minimum delay between the start
//! of consecutive permitted requests. [`RateLimiter::acquire`] suspends the
//! calling task until both are satisfied; it never errors.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Length of the rolling quota window.
const WINDOW: Duration = Duration::from_secs(3600);

/// Mutable limiter state. All fields are read and written under one lock:
/// a task computing its wait must not interleave with another task
/// recording a permitted request, or the hourly cap can be exceeded.
#[derive(Debug)]
struct RateLimitState {
    request_count: u32,
    window_reset_at: Instant,
    last_request_at: Option<Instant>,
}

/// Snapshot of the limiter for observability endpoints. Side-effect free.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitStatus {
    pub request_count: u32,
    pub max_requests: u32,
    pub remaining_requests: u32,
    pub reset_at: DateTime<Utc>,
}

/// Throttles outbound calls within a rolling hourly quota and a minimum
/// inter-request delay.
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<RateLimitState>,
    max_requests_per_hour: u32,
    min_delay: Duration,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max_requests_per_hour: u32, min_delay_ms: u64) -> Self {
        Self {
            state: Mutex::new(RateLimitState {
                request_count: 0,
                window_reset_at: Instant::now() + WINDOW,
                last_request_at: None,
            }),
            max_requests_per_hour,
            min_delay: Duration::from_millis(min_delay_ms),
        }
    }

    /// Waits until a request may proceed, then records it.
    ///
    /// The state lock is held across the entire wait-and-record sequence,
    /// so concurrent acquirers serialize and each observes the count the
    /// previous one recorded.
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;

        let now = Instant::now();
        if now >= state.window_reset_at {
            state.request_count = 0;
            state.window_reset_at = now + WINDOW;
            tracing::debug!("rate limit window expired; counter reset");
        }

        if state.request_count >= self.max_requests_per_hour {
            let wait = state.window_reset_at.saturating_duration_since(now);
            tracing::info!(
                cap = self.max_requests_per_hour,
                wait_secs = wait.as_secs(),
                "hourly request cap reached; waiting for window reset"
            );
            tokio::time::sleep_until(state.window_reset_at).await;
            state.request_count = 0;
            state.window_reset_at = Instant::now() + WINDOW;
        }

        if let Some(last) = state.last_request_at {
            let since_last = Instant::now().saturating_duration_since(last);
            if since_last < self.min_delay {
                tokio::time::sleep(self.min_delay - since_last).await;
            }
        }

        state.last_request_at = Some(Instant::now());
        state.request_count += 1;
    }

    /// Current count, cap, remaining allowance, and window reset time.
    pub async fn status(&self) -> RateLimitStatus {
        let state = self.state.lock().await;
        let until_reset = state
            .window_reset_at
            .saturating_duration_since(Instant::now());
        RateLimitStatus {
            request_count: state.request_count,
            max_requests: self.max_requests_per_hour,
            remaining_requests: self
                .max_requests_per_hour
                .saturating_sub(state.request_count),
            reset_at: Utc::now()
                + chrono::Duration::from_std(until_reset).unwrap_or_else(|_| chrono::Duration::zero()),
        }
    }
}
