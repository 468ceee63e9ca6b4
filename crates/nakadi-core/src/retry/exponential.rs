//! Exponential backoff with an elapsed-time budget.

use super::strategy::BackoffStrategy;
use std::time::Duration;

const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);
const DEFAULT_MAX_ELAPSED: Duration = Duration::from_secs(15 * 60);
const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Exponential backoff strategy.
///
/// Delays between retries grow as `initial_delay * multiplier^retry` and are
/// capped at `max_delay`. With the default jitter of `0.0` the sequence is
/// fully deterministic.
///
/// # Mathematical Formula
///
/// For retry `n` (0-indexed after the first failure):
/// ```text
/// base_delay   = initial_delay * (multiplier ^ n)
/// capped_delay = min(base_delay, max_delay)
/// jittered     = capped_delay * (1 + jitter * random(-1.0, +1.0))
/// final_delay  = clamp(jittered, 0, max_delay)
/// ```
///
/// # Examples
///
/// ```rust
/// use nakadi_core::retry::{BackoffStrategy, ExponentialBackoff};
/// use std::time::Duration;
///
/// // Defaults: initial=500ms, max=60s, multiplier=2.0, jitter=0.0, budget=15min
/// let backoff = ExponentialBackoff::default();
/// assert_eq!(backoff.next_delay(1), Some(Duration::from_secs(1)));
///
/// let backoff = ExponentialBackoff::builder()
///     .initial_delay(Duration::from_millis(100))
///     .max_delay(Duration::from_secs(30))
///     .max_elapsed(Duration::from_secs(120))
///     .build();
/// assert_eq!(backoff.max_elapsed(), Some(Duration::from_secs(120)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: f64,
    max_elapsed: Option<Duration>,
    max_retries: Option<u32>,
}

impl ExponentialBackoff {
    /// Create a new builder for configuring exponential backoff.
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }

    /// Delay before the first retry.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Ceiling no single delay exceeds.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        ExponentialBackoffBuilder::default().build()
    }
}

impl BackoffStrategy for ExponentialBackoff {
    fn next_delay(&self, retry: u32) -> Option<Duration> {
        // 2^64 nanoseconds already exceeds any representable ceiling
        let exponent = retry.min(64) as i32;
        let base = self.initial_delay.as_nanos() as f64 * self.multiplier.powi(exponent);
        let ceiling = self.max_delay.as_nanos() as f64;
        let capped = base.min(ceiling);

        let jittered = if self.jitter > 0.0 {
            let spread = capped * self.jitter * (rand::random::<f64>() - 0.5) * 2.0;
            capped + spread
        } else {
            capped
        };

        Some(Duration::from_nanos(
            jittered.clamp(0.0, ceiling).round() as u64,
        ))
    }

    fn max_elapsed(&self) -> Option<Duration> {
        self.max_elapsed
    }

    fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }
}

/// Builder for configuring [`ExponentialBackoff`].
///
/// # Examples
///
/// ```rust
/// use nakadi_core::retry::ExponentialBackoff;
/// use std::time::Duration;
///
/// let backoff = ExponentialBackoff::builder()
///     .initial_delay(Duration::from_millis(100))
///     .max_delay(Duration::from_secs(30))
///     .multiplier(2.0)
///     .jitter(0.1)
///     .unbounded()
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
    multiplier: Option<f64>,
    jitter: Option<f64>,
    max_elapsed: Option<Option<Duration>>,
    max_retries: Option<u32>,
}

impl ExponentialBackoffBuilder {
    /// Set the delay before the first retry.
    ///
    /// Default: 500ms
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set the maximum delay between retries.
    ///
    /// Default: 60s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the exponential multiplier.
    ///
    /// Default: 2.0 (doubles each time)
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Set the jitter factor (0.0 to 1.0).
    ///
    /// A jitter of 0.1 lets each delay vary by ±10%, still bounded by the
    /// maximum delay.
    ///
    /// Default: 0.0
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(jitter.clamp(0.0, 1.0));
        self
    }

    /// Set the total time budget for one operation.
    ///
    /// Default: 15 minutes
    pub fn max_elapsed(mut self, budget: Duration) -> Self {
        self.max_elapsed = Some(Some(budget));
        self
    }

    /// Remove the elapsed-time budget.
    pub fn unbounded(mut self) -> Self {
        self.max_elapsed = Some(None);
        self
    }

    /// Cap the number of retries after the initial attempt.
    ///
    /// Default: no cap
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Build the [`ExponentialBackoff`], using defaults for unset parameters.
    pub fn build(self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_delay: self.initial_delay.unwrap_or(DEFAULT_INITIAL_DELAY),
            max_delay: self.max_delay.unwrap_or(DEFAULT_MAX_DELAY),
            multiplier: self.multiplier.unwrap_or(DEFAULT_MULTIPLIER),
            jitter: self.jitter.unwrap_or(0.0),
            max_elapsed: self.max_elapsed.unwrap_or(Some(DEFAULT_MAX_ELAPSED)),
            max_retries: self.max_retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn deterministic(initial_ms: u64, max_ms: u64) -> ExponentialBackoff {
        ExponentialBackoff::builder()
            .initial_delay(Duration::from_millis(initial_ms))
            .max_delay(Duration::from_millis(max_ms))
            .build()
    }

    #[test]
    fn test_exponential_delay_calculation() {
        let backoff = deterministic(100, 10_000);

        assert_eq!(backoff.next_delay(0), Some(Duration::from_millis(100)));
        assert_eq!(backoff.next_delay(1), Some(Duration::from_millis(200)));
        assert_eq!(backoff.next_delay(2), Some(Duration::from_millis(400)));
        assert_eq!(backoff.next_delay(3), Some(Duration::from_millis(800)));
    }

    #[test]
    fn test_max_delay_cap() {
        let backoff = deterministic(1_000, 5_000);

        assert_eq!(backoff.next_delay(2), Some(Duration::from_secs(4)));
        for retry in 3..200 {
            assert_eq!(backoff.next_delay(retry), Some(Duration::from_secs(5)));
        }
        assert_eq!(backoff.next_delay(u32::MAX), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_initial_above_ceiling_is_clamped() {
        let backoff = deterministic(10_000, 2_000);
        assert_eq!(backoff.next_delay(0), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_jitter_variation_stays_under_ceiling() {
        let backoff = ExponentialBackoff::builder()
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_millis(1_200))
            .jitter(0.5)
            .build();

        let delays: Vec<_> = (0..20).map(|_| backoff.next_delay(0).unwrap()).collect();
        for delay in &delays {
            let millis = delay.as_millis();
            assert!(
                (500..=1_200).contains(&millis),
                "jittered delay out of range: {}ms",
                millis
            );
        }

        let all_same = delays.windows(2).all(|w| w[0] == w[1]);
        assert!(!all_same, "With randomization, delays should vary");
    }

    #[test]
    fn test_builder_defaults() {
        let backoff = ExponentialBackoff::builder().build();

        assert_eq!(backoff.initial_delay, Duration::from_millis(500));
        assert_eq!(backoff.max_delay, Duration::from_secs(60));
        assert_eq!(backoff.multiplier, 2.0);
        assert_eq!(backoff.jitter, 0.0);
        assert_eq!(backoff.max_elapsed, Some(Duration::from_secs(900)));
        assert_eq!(backoff.max_retries, None);
    }

    #[test]
    fn test_builder_custom_values() {
        let backoff = ExponentialBackoff::builder()
            .initial_delay(Duration::from_millis(200))
            .max_delay(Duration::from_secs(30))
            .multiplier(1.5)
            .jitter(0.2)
            .max_retries(4)
            .unbounded()
            .build();

        assert_eq!(backoff.initial_delay, Duration::from_millis(200));
        assert_eq!(backoff.max_delay, Duration::from_secs(30));
        assert_eq!(backoff.multiplier, 1.5);
        assert_eq!(backoff.jitter, 0.2);
        assert_eq!(backoff.max_elapsed(), None);
        assert_eq!(backoff.max_retries(), Some(4));
    }

    #[test]
    fn test_jitter_clamped() {
        let backoff = ExponentialBackoff::builder().jitter(2.0).build();
        assert_eq!(backoff.jitter, 1.0);

        let backoff = ExponentialBackoff::builder().jitter(-0.5).build();
        assert_eq!(backoff.jitter, 0.0);
    }

    proptest! {
        #[test]
        fn delays_never_decrease_and_never_exceed_cap(
            initial_ms in 1u64..5_000,
            max_ms in 1u64..120_000,
        ) {
            let backoff = deterministic(initial_ms, max_ms);
            let cap = Duration::from_millis(max_ms);

            let mut previous = Duration::ZERO;
            for retry in 0..40 {
                let delay = backoff.next_delay(retry).unwrap();
                prop_assert!(delay >= previous);
                prop_assert!(delay <= cap);
                previous = delay;
            }
            prop_assert_eq!(previous, cap);
        }
    }
}
