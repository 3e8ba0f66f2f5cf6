// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Retry logic with exponential backoff for Kubernetes API calls.
//!
//! This module retries transient API errors (429, 5xx, transport failures)
//! with exponential backoff, while failing fast on permanent errors (4xx
//! client errors). The suite is a single short-lived process, so the backoff
//! carries no jitter.

use crate::constants::{
    RETRY_BACKOFF_MULTIPLIER, RETRY_INITIAL_INTERVAL_MILLIS, RETRY_MAX_INTERVAL_SECS,
};
use crate::errors::{Result, SmokeError};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Simple exponential backoff bounded by a total time budget.
pub struct ExponentialBackoff {
    /// Current interval duration
    pub current_interval: Duration,
    /// Initial interval duration
    pub initial_interval: Duration,
    /// Maximum interval duration
    pub max_interval: Duration,
    /// Maximum total elapsed time
    pub max_elapsed_time: Duration,
    /// Backoff multiplier (typically 2.0 for doubling)
    pub multiplier: f64,
    /// Start time for tracking total elapsed time
    start_time: Instant,
}

impl ExponentialBackoff {
    /// Create a new exponential backoff with specified parameters.
    #[must_use]
    pub fn new(
        initial_interval: Duration,
        max_interval: Duration,
        max_elapsed_time: Duration,
        multiplier: f64,
    ) -> Self {
        Self {
            current_interval: initial_interval,
            initial_interval,
            max_interval,
            max_elapsed_time,
            multiplier,
            start_time: Instant::now(),
        }
    }

    /// Get the next backoff interval, or None if the time budget is spent.
    ///
    /// The returned interval never sleeps past the end of the budget.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        let remaining = self
            .max_elapsed_time
            .checked_sub(self.start_time.elapsed())
            .filter(|remaining| !remaining.is_zero())?;

        let interval = self.current_interval.min(remaining);

        let next = self.current_interval.as_secs_f64() * self.multiplier;
        self.current_interval = Duration::from_secs_f64(next).min(self.max_interval);

        Some(interval)
    }
}

/// Backoff for Kubernetes API calls within `max_elapsed_time`.
///
/// Retries occur at roughly 100ms, 200ms, 400ms, 800ms, 1.6s, 3.2s and then
/// every 5s until the budget is spent.
#[must_use]
pub fn default_backoff(max_elapsed_time: Duration) -> ExponentialBackoff {
    ExponentialBackoff::new(
        Duration::from_millis(RETRY_INITIAL_INTERVAL_MILLIS),
        Duration::from_secs(RETRY_MAX_INTERVAL_SECS),
        max_elapsed_time,
        RETRY_BACKOFF_MULTIPLIER,
    )
}

/// Retry a Kubernetes API call with exponential backoff.
///
/// Retries on transient errors (HTTP 429, 5xx, transport) and fails
/// immediately on anything else.
///
/// # Arguments
///
/// * `operation` - Async function that performs the API call
/// * `operation_name` - Human-readable name for logging
///   (e.g., "get Service jarombek-com/jarombek-com")
/// * `max_elapsed_time` - Total time budget for all attempts
///
/// # Errors
///
/// Returns [`SmokeError::Api`] for a non-retryable error, or
/// [`SmokeError::RetriesExhausted`] once the budget is spent.
pub async fn retry_api_call<T, F, Fut>(
    mut operation: F,
    operation_name: &str,
    max_elapsed_time: Duration,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, kube::Error>>,
{
    let mut backoff = default_backoff(max_elapsed_time);
    let start_time = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(
                        operation = operation_name,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        "Kubernetes API call succeeded after retries"
                    );
                } else {
                    debug!(operation = operation_name, "Kubernetes API call succeeded");
                }
                return Ok(value);
            }
            Err(e) => {
                if !is_retryable_error(&e) {
                    error!(
                        operation = operation_name,
                        error = %e,
                        "Non-retryable Kubernetes API error, failing immediately"
                    );
                    return Err(SmokeError::Api {
                        operation: operation_name.to_string(),
                        source: e,
                    });
                }

                let Some(duration) = backoff.next_backoff() else {
                    error!(
                        operation = operation_name,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        error = %e,
                        "Retry budget exhausted, giving up"
                    );
                    return Err(SmokeError::RetriesExhausted {
                        operation: operation_name.to_string(),
                        attempts: attempt,
                        source: e,
                    });
                };

                warn!(
                    operation = operation_name,
                    attempt = attempt,
                    retry_after = ?duration,
                    error = %e,
                    "Retryable Kubernetes API error, will retry"
                );
                tokio::time::sleep(duration).await;
            }
        }
    }
}

/// Determine if a Kubernetes error is retryable.
///
/// HTTP 429 and 5xx responses and transport errors are transient; every
/// other error (bad request, forbidden, decode failures) is permanent.
pub(crate) fn is_retryable_error(err: &kube::Error) -> bool {
    match err {
        kube::Error::Api(api_err) => {
            api_err.code == 429 || (api_err.code >= 500 && api_err.code < 600)
        }
        kube::Error::Service(_) => true,
        _ => false,
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
