//! The backoff strategy abstraction.

use std::fmt;
use std::time::Duration;

/// A strategy describing how long to wait between retry attempts and when to
/// give up.
///
/// Strategies are pure: they hold no per-operation state. A
/// [`BackoffSchedule`](super::BackoffSchedule) pairs a strategy with a start
/// instant and a retry counter for the lifetime of one operation, so a single
/// strategy can be shared by any number of concurrent operations.
///
/// # Examples
///
/// ```rust
/// use nakadi_core::retry::BackoffStrategy;
/// use std::time::Duration;
///
/// /// Waits the same amount of time between every attempt, at most three times.
/// #[derive(Debug)]
/// struct Constant(Duration);
///
/// impl BackoffStrategy for Constant {
///     fn next_delay(&self, _retry: u32) -> Option<Duration> {
///         Some(self.0)
///     }
///
///     fn max_retries(&self) -> Option<u32> {
///         Some(3)
///     }
/// }
///
/// let strategy = Constant(Duration::from_millis(10));
/// assert_eq!(strategy.next_delay(7), Some(Duration::from_millis(10)));
/// assert_eq!(strategy.max_elapsed(), None);
/// ```
pub trait BackoffStrategy: Send + Sync + fmt::Debug {
    /// Calculate the delay before retry number `retry` (0-indexed).
    ///
    /// `next_delay(0)` is the wait between the first failed attempt and the
    /// second attempt. Returning `None` stops retrying.
    fn next_delay(&self, retry: u32) -> Option<Duration>;

    /// Total wall-clock budget for one operation, measured from its first
    /// attempt. `None` means unbounded.
    fn max_elapsed(&self) -> Option<Duration> {
        None
    }

    /// Maximum number of retries after the initial attempt. `None` means the
    /// elapsed-time budget is the only limit.
    fn max_retries(&self) -> Option<u32> {
        None
    }
}
