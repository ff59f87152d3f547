// src/utils/retry.rs

//! Bounded retry wrapper for fallible external calls.

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, Result};

/// Invoke `operation` up to `attempts` times, pausing `delay` between tries.
///
/// The delay is fixed: no backoff growth, no jitter. When every try fails
/// the last error is folded into [`AppError::MaxRetriesExceeded`].
pub async fn retry<F, Fut, T>(mut operation: F, attempts: u32, delay: Duration) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last: Option<AppError> = None;

    for attempt in 1..=attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!("Retry {attempt}/{attempts} failed: {e}");
                last = Some(e);
                if attempt < attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(AppError::MaxRetriesExceeded {
        attempts,
        last: last.map(|e| e.to_string()).unwrap_or_default(),
    })
}
