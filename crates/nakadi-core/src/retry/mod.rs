//! Retry strategies and backoff scheduling.
//!
//! # Key Types
//!
//! - [`BackoffStrategy`] - Pure description of the wait sequence and budget
//! - [`ExponentialBackoff`] - Doubling delays capped at a ceiling
//! - [`BackoffSchedule`] - Stateful per-operation cursor over a strategy
//! - [`retry`] - Drives an async operation through a schedule
//!
//! # Examples
//!
//! ```rust
//! use nakadi_core::retry::{BackoffSchedule, ExponentialBackoff};
//! use std::time::Duration;
//!
//! let backoff = ExponentialBackoff::builder()
//!     .initial_delay(Duration::from_millis(100))
//!     .max_delay(Duration::from_millis(300))
//!     .build();
//!
//! let mut schedule = BackoffSchedule::new(&backoff);
//! assert_eq!(schedule.next_backoff(), Some(Duration::from_millis(100)));
//! assert_eq!(schedule.next_backoff(), Some(Duration::from_millis(200)));
//! assert_eq!(schedule.next_backoff(), Some(Duration::from_millis(300)));
//! ```

mod execute;
mod exponential;
mod schedule;
mod strategy;

pub use execute::{RetryError, retry};
pub use exponential::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use schedule::BackoffSchedule;
pub use strategy::BackoffStrategy;
