//! Per-operation backoff state.

use super::strategy::BackoffStrategy;
use std::time::Duration;
use tokio::time::Instant;

/// A stateful cursor over a [`BackoffStrategy`] for one logical operation.
///
/// The schedule starts its clock on construction. Each call to
/// [`next_backoff`](Self::next_backoff) first checks the elapsed-time budget
/// and the retry cap; only if both still allow another attempt does it hand
/// out the next wait.
///
/// The clock is [`tokio::time::Instant`], so tests running on a paused tokio
/// runtime observe exact, deterministic elapsed times.
#[derive(Debug)]
pub struct BackoffSchedule<'a, S: BackoffStrategy + ?Sized> {
    strategy: &'a S,
    started: Instant,
    retries: u32,
}

impl<'a, S: BackoffStrategy + ?Sized> BackoffSchedule<'a, S> {
    /// Start a schedule now.
    pub fn new(strategy: &'a S) -> Self {
        Self {
            strategy,
            started: Instant::now(),
            retries: 0,
        }
    }

    /// Produce the next wait, or `None` once the budget is spent.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if let Some(budget) = self.strategy.max_elapsed()
            && self.elapsed() >= budget
        {
            return None;
        }
        if let Some(max) = self.strategy.max_retries()
            && self.retries >= max
        {
            return None;
        }

        let delay = self.strategy.next_delay(self.retries)?;
        self.retries += 1;
        Some(delay)
    }

    /// Time since the schedule started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Number of waits handed out so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }
}
