#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core retry primitives for the Nakadi client.
//!
//! This crate owns the backoff state machine used by the subscription API:
//!
//! - **Backoff strategies** via the [`BackoffStrategy`](retry::BackoffStrategy) trait
//!   - Deterministic exponential growth capped at a ceiling
//!   - Optional jitter that never exceeds the ceiling
//!   - An overall elapsed-time budget
//! - **Per-operation schedules** via [`BackoffSchedule`](retry::BackoffSchedule)
//! - **A cancellable retry driver** via [`retry`](retry::retry)
//!
//! # Examples
//!
//! ```rust
//! use nakadi_core::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backoff = ExponentialBackoff::builder()
//!     .initial_delay(Duration::from_millis(100))
//!     .max_delay(Duration::from_secs(5))
//!     .max_elapsed(Duration::from_secs(30))
//!     .build();
//!
//! let cancel = CancellationToken::new();
//! let value = retry(&backoff, &cancel, |_: &std::io::Error| true, |_attempt| async {
//!     Ok::<_, std::io::Error>(42)
//! })
//! .await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

pub mod retry;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use nakadi_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::retry::{
        BackoffSchedule, BackoffStrategy, ExponentialBackoff, ExponentialBackoffBuilder,
        RetryError, retry,
    };
    pub use tokio_util::sync::CancellationToken;
}
