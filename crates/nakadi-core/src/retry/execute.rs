//! Cancellable retry driver.

use super::schedule::BackoffSchedule;
use super::strategy::BackoffStrategy;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Why [`retry`] gave up.
#[derive(Debug, Error)]
pub enum RetryError<E: std::error::Error + 'static> {
    /// The operation failed with an error the predicate treats as permanent.
    #[error(transparent)]
    Permanent(E),

    /// Transient failures persisted until the schedule ran out.
    #[error("retries exhausted after {attempts} attempts in {elapsed:?}: {last}")]
    Exhausted {
        /// The error returned by the final attempt
        #[source]
        last: E,
        /// Total attempts made, including the first
        attempts: u32,
        /// Time spent since the first attempt
        elapsed: Duration,
    },

    /// The cancellation token fired.
    #[error("operation cancelled after {attempts} attempts")]
    Cancelled {
        /// Attempts started before cancellation was observed
        attempts: u32,
    },
}

/// Run `operation` until it succeeds, fails permanently, the schedule derived
/// from `strategy` is exhausted, or `cancel` fires.
///
/// `operation` receives the 0-indexed attempt number. `is_transient` decides
/// which errors are worth another attempt; everything else is returned as
/// [`RetryError::Permanent`] immediately.
///
/// Cancellation is observed before each attempt, while an attempt is in
/// flight, and during each wait.
///
/// # Examples
///
/// ```rust
/// use nakadi_core::retry::{ExponentialBackoff, RetryError, retry};
/// use tokio_util::sync::CancellationToken;
/// use std::time::Duration;
///
/// # async fn example() {
/// let backoff = ExponentialBackoff::builder()
///     .initial_delay(Duration::from_millis(1))
///     .max_retries(2)
///     .build();
///
/// let result = retry(&backoff, &CancellationToken::new(), |_| true, |_| async {
///     Err::<(), _>(std::io::Error::other("connection refused"))
/// })
/// .await;
///
/// assert!(matches!(result, Err(RetryError::Exhausted { attempts: 3, .. })));
/// # }
/// ```
pub async fn retry<S, F, Fut, T, E, P>(
    strategy: &S,
    cancel: &CancellationToken,
    is_transient: P,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    S: BackoffStrategy + ?Sized,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::error::Error + 'static,
    P: Fn(&E) -> bool,
{
    let mut schedule = BackoffSchedule::new(strategy);

    loop {
        let attempt = schedule.retries();
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled { attempts: attempt });
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(RetryError::Cancelled { attempts: attempt + 1 });
            }
            outcome = operation(attempt) => outcome,
        };

        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(err) if !is_transient(&err) => return Err(RetryError::Permanent(err)),
            Err(err) => err,
        };

        let Some(delay) = schedule.next_backoff() else {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                attempts = attempt + 1,
                elapsed_ms = schedule.elapsed().as_millis() as u64,
                "Retry budget exhausted"
            );
            return Err(RetryError::Exhausted {
                last: err,
                attempts: attempt + 1,
                elapsed: schedule.elapsed(),
            });
        };

        #[cfg(feature = "tracing")]
        tracing::warn!(
            attempt = attempt + 1,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Transient failure, backing off"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(RetryError::Cancelled { attempts: attempt + 1 });
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
