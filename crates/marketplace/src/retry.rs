//! Exponential-backoff retry wrapper for provider calls.
//!
//! Adapters wrap idempotent read operations and the final publish step of
//! listing creation in [`with_retry`]. Non-idempotent mutating calls are
//! not wrapped: without a dedupe key a blind retry can create duplicate
//! listings on the provider.

use std::future::Future;
use std::time::Duration;

use log::warn;
use tokio::time::sleep;

use crate::errors::{MarketplaceError, RetryClass};

/// Options for [`with_retry`].
#[derive(Debug, Clone, Copy)]
pub struct RetryOptions {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_delay: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

/// Executes `op`, retrying transient failures with exponential backoff.
///
/// After a failed attempt the task sleeps `base_delay * 2^n` (n = 0 for the
/// first retry) and tries again, up to `max_attempts` total attempts. The
/// sleep suspends only the calling task; concurrent orchestrations are not
/// blocked. The last error is re-raised once attempts are exhausted.
///
/// Errors classified [`RetryClass::Never`] (validation, authentication,
/// permission, not-found) are returned immediately without burning the
/// remaining attempts.
pub async fn with_retry<T, F, Fut>(
    options: RetryOptions,
    mut op: F,
) -> Result<T, MarketplaceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketplaceError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if attempt >= options.max_attempts || err.retry_class() == RetryClass::Never {
                    return Err(err);
                }
                let delay = options.base_delay * 2u32.saturating_pow(attempt - 1);
                warn!(
                    "Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt, options.max_attempts, err, delay
                );
                sleep(delay).await;
            }
        }
    }
}
