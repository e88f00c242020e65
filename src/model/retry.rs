//! Shared exponential backoff retry logic for model transport calls.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;

use crate::error::ModelError;

/// Configuration: 3 total attempts, base 1s, max 30s.
pub const MAX_ATTEMPTS: u32 = 3;
const INITIAL_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 30;

/// Retry an async transport operation with exponential backoff.
///
/// `attempt` is called up to [`MAX_ATTEMPTS`] times. On each failure, the
/// returned error is stashed and the task sleeps for an exponentially
/// increasing duration before the next attempt. The last error is wrapped
/// in [`ModelError::RetriesExhausted`] when the budget runs out.
pub async fn retry_with_backoff<T, Fut, F>(mut attempt: F) -> Result<T, ModelError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ModelError>>,
{
    let mut backoff = ExponentialBackoff {
        initial_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
        max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
        max_elapsed_time: None,
        ..Default::default()
    };

    let mut attempts = 0;
    let mut last_error = None;

    while attempts < MAX_ATTEMPTS {
        attempts += 1;

        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                last_error = Some(e);

                if attempts < MAX_ATTEMPTS
                    && let Some(wait_duration) = backoff.next_backoff()
                {
                    tokio::time::sleep(wait_duration).await;
                }
            }
        }
    }

    match last_error {
        Some(e) => Err(ModelError::RetriesExhausted(Box::new(e))),
        None => Err(ModelError::ExecutionFailed(
            "retry loop exited without running".to_string(),
        )),
    }
}
