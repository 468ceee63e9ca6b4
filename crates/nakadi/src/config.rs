//! Configuration for the Nakadi client

use crate::error::{Error, Result};
use http::HeaderMap;
use nakadi_core::retry::ExponentialBackoff;
use secrecy::SecretString;
use std::time::Duration;

/// Default broker address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default wait before the first retry.
pub const DEFAULT_INITIAL_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// Default upper bound for a single retry wait.
pub const DEFAULT_MAX_RETRY_INTERVAL: Duration = Duration::from_secs(60);

/// Default total time budget for retries.
pub const DEFAULT_MAX_ELAPSED_TIME: Duration = Duration::from_secs(15 * 60);

/// Values substituted for unset [`RetryPolicy`] fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDefaults {
    /// Wait before the first retry
    pub initial_interval: Duration,
    /// Upper bound for a single wait
    pub max_interval: Duration,
    /// Total time budget
    pub max_elapsed: Duration,
}

impl RetryDefaults {
    /// 500 ms initial wait, 60 s cap, 15 min budget.
    pub const STANDARD: RetryDefaults = RetryDefaults {
        initial_interval: DEFAULT_INITIAL_RETRY_INTERVAL,
        max_interval: DEFAULT_MAX_RETRY_INTERVAL,
        max_elapsed: DEFAULT_MAX_ELAPSED_TIME,
    };
}

impl Default for RetryDefaults {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Retry settings for subscription operations.
///
/// A zero duration means "not set" and is replaced by the default when the
/// policy is resolved. Retries are off unless `enabled` is set.
///
/// ```rust
/// use nakadi::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::resolve(Some(
///     &RetryPolicy::enabled().with_max_elapsed(Duration::from_secs(5)),
/// ));
///
/// assert!(policy.enabled);
/// assert_eq!(policy.initial_interval, Duration::from_millis(500));
/// assert_eq!(policy.max_elapsed, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// Whether transient failures are retried
    pub enabled: bool,
    /// Wait before the first retry
    pub initial_interval: Duration,
    /// Upper bound for a single wait
    pub max_interval: Duration,
    /// Total time budget for the operation
    pub max_elapsed: Duration,
}

impl RetryPolicy {
    /// An empty policy with retries turned on.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Resolve optional user input into a fully specified policy.
    ///
    /// `None` yields the standard defaults with retries disabled.
    pub fn resolve(input: Option<&RetryPolicy>) -> RetryPolicy {
        input.copied().unwrap_or_default().with_defaults()
    }

    /// Fill unset fields from [`RetryDefaults::STANDARD`].
    pub fn with_defaults(self) -> Self {
        self.with_defaults_from(&RetryDefaults::STANDARD)
    }

    /// Fill unset fields from `defaults`, keeping every field that is set.
    pub fn with_defaults_from(mut self, defaults: &RetryDefaults) -> Self {
        if self.initial_interval.is_zero() {
            self.initial_interval = defaults.initial_interval;
        }
        if self.max_interval.is_zero() {
            self.max_interval = defaults.max_interval;
        }
        if self.max_elapsed.is_zero() {
            self.max_elapsed = defaults.max_elapsed;
        }
        self
    }

    /// Set the wait before the first retry.
    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    /// Set the cap for a single wait.
    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    /// Set the total time budget.
    pub fn with_max_elapsed(mut self, budget: Duration) -> Self {
        self.max_elapsed = budget;
        self
    }

    /// Backoff strategy for this policy.
    ///
    /// Waits double from `initial_interval` up to `max_interval` without
    /// jitter, and stop once `max_elapsed` is spent. An initial interval above
    /// the cap is kept as configured; the strategy clamps each wait.
    pub fn backoff(&self) -> ExponentialBackoff {
        let resolved = self.with_defaults();
        ExponentialBackoff::builder()
            .initial_delay(resolved.initial_interval)
            .max_delay(resolved.max_interval)
            .max_elapsed(resolved.max_elapsed)
            .build()
    }
}

/// Configuration for the Nakadi client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Broker base URL
    pub base_url: String,

    /// Bearer token sent as `Authorization` header
    pub auth_token: Option<SecretString>,

    /// Timeout for a single request
    pub timeout: Duration,

    /// Timeout for establishing a connection
    pub connect_timeout: Duration,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,

    /// Retry settings used by [`Client::subscriptions`](crate::Client::subscriptions)
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            default_headers: HeaderMap::new(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the broker at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present. This
    /// will look for:
    /// - `NAKADI_URL` for the broker base URL
    /// - `NAKADI_TOKEN` for the bearer token
    /// - `NAKADI_TIMEOUT` for request timeout (in seconds)
    /// - `NAKADI_RETRY` to enable retries (`true`/`false`)
    /// - `NAKADI_INITIAL_RETRY_INTERVAL_MS`, `NAKADI_MAX_RETRY_INTERVAL_MS`
    /// - `NAKADI_MAX_ELAPSED_TIME_SECS`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a variable is set but cannot be parsed.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        use std::env;

        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(base_url) = env::var("NAKADI_URL")
            && !base_url.trim().is_empty()
        {
            config.base_url = base_url;
        }

        if let Ok(token) = env::var("NAKADI_TOKEN")
            && !token.is_empty()
        {
            config.auth_token = Some(SecretString::new(token.into_boxed_str()));
        }

        if let Some(secs) = parse_env::<u64>("NAKADI_TIMEOUT")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(enabled) = parse_env::<bool>("NAKADI_RETRY")? {
            config.retry.enabled = enabled;
        }
        if let Some(ms) = parse_env::<u64>("NAKADI_INITIAL_RETRY_INTERVAL_MS")? {
            config.retry.initial_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_env::<u64>("NAKADI_MAX_RETRY_INTERVAL_MS")? {
            config.retry.max_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_env::<u64>("NAKADI_MAX_ELAPSED_TIME_SECS")? {
            config.retry.max_elapsed = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Merge this configuration with another, with the other taking precedence.
    ///
    /// Fields of `other` still at their default value do not override. For
    /// `retry.enabled` the default is `false`, so a merge can switch retries
    /// on but never off; set `retry` on the result directly to disable them.
    pub fn merge(mut self, other: ClientConfig) -> Self {
        if other.base_url != DEFAULT_BASE_URL {
            self.base_url = other.base_url;
        }
        if other.auth_token.is_some() {
            self.auth_token = other.auth_token;
        }
        if other.timeout != DEFAULT_TIMEOUT {
            self.timeout = other.timeout;
        }
        if other.connect_timeout != DEFAULT_CONNECT_TIMEOUT {
            self.connect_timeout = other.connect_timeout;
        }
        for (key, value) in other.default_headers.iter() {
            self.default_headers.insert(key.clone(), value.clone());
        }
        if other.retry.enabled {
            self.retry.enabled = true;
        }
        if !other.retry.initial_interval.is_zero() {
            self.retry.initial_interval = other.retry.initial_interval;
        }
        if !other.retry.max_interval.is_zero() {
            self.retry.max_interval = other.retry.max_interval;
        }
        if !other.retry.max_elapsed.is_zero() {
            self.retry.max_elapsed = other.retry.max_elapsed;
        }

        self
    }
}

#[cfg(feature = "env")]
fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("{name}={raw:?}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Builder for creating ClientConfig with a fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the bearer token.
    pub fn auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.config.auth_token = Some(SecretString::new(auth_token.into().into_boxed_str()));
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the retry policy.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Add a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| Error::Config(format!("invalid header name: {key_str}")))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| Error::Config(format!("invalid header value for {key_str}")))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nakadi_core::retry::BackoffStrategy;
    use proptest::prelude::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_resolve_none_yields_defaults() {
        let policy = RetryPolicy::resolve(None);
        assert_eq!(
            policy,
            RetryPolicy {
                enabled: false,
                initial_interval: Duration::from_millis(500),
                max_interval: Duration::from_secs(60),
                max_elapsed: Duration::from_secs(900),
            }
        );
    }

    #[test]
    fn test_resolve_keeps_set_fields() {
        let input = RetryPolicy::enabled().with_max_interval(Duration::from_secs(2));
        let policy = RetryPolicy::resolve(Some(&input));

        assert!(policy.enabled);
        assert_eq!(policy.initial_interval, DEFAULT_INITIAL_RETRY_INTERVAL);
        assert_eq!(policy.max_interval, Duration::from_secs(2));
        assert_eq!(policy.max_elapsed, DEFAULT_MAX_ELAPSED_TIME);
    }

    #[test]
    fn test_initial_above_max_is_preserved() {
        let input = RetryPolicy::default()
            .with_initial_interval(Duration::from_secs(10))
            .with_max_interval(Duration::from_secs(1));
        let policy = input.with_defaults();

        assert_eq!(policy.initial_interval, Duration::from_secs(10));
        assert_eq!(policy.max_interval, Duration::from_secs(1));
        assert_eq!(policy.backoff().next_delay(0), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_with_defaults_from_custom_table() {
        let defaults = RetryDefaults {
            initial_interval: Duration::from_millis(10),
            max_interval: Duration::from_millis(80),
            max_elapsed: Duration::from_secs(1),
        };
        let policy = RetryPolicy::default().with_defaults_from(&defaults);

        assert_eq!(policy.initial_interval, Duration::from_millis(10));
        assert_eq!(policy.max_interval, Duration::from_millis(80));
        assert_eq!(policy.max_elapsed, Duration::from_secs(1));
        assert_eq!(RetryDefaults::default(), RetryDefaults::STANDARD);
    }

    #[test]
    fn test_backoff_matches_policy() {
        let backoff = RetryPolicy::enabled()
            .with_initial_interval(Duration::from_millis(100))
            .with_max_interval(Duration::from_millis(300))
            .with_max_elapsed(Duration::from_secs(2))
            .backoff();

        assert_eq!(backoff.next_delay(0), Some(Duration::from_millis(100)));
        assert_eq!(backoff.next_delay(1), Some(Duration::from_millis(200)));
        assert_eq!(backoff.next_delay(2), Some(Duration::from_millis(300)));
        assert_eq!(backoff.max_elapsed(), Some(Duration::from_secs(2)));
    }

    fn duration_ms() -> impl Strategy<Value = Duration> {
        prop_oneof![Just(Duration::ZERO), (1u64..120_000).prop_map(Duration::from_millis)]
    }

    proptest! {
        #[test]
        fn with_defaults_is_idempotent(
            enabled in any::<bool>(),
            initial in duration_ms(),
            max in duration_ms(),
            elapsed in duration_ms(),
        ) {
            let input = RetryPolicy {
                enabled,
                initial_interval: initial,
                max_interval: max,
                max_elapsed: elapsed,
            };
            let once = input.with_defaults();

            prop_assert_eq!(once.with_defaults(), once);
            prop_assert_eq!(once.enabled, enabled);
            prop_assert!(!once.initial_interval.is_zero());
            prop_assert!(!once.max_interval.is_zero());
            prop_assert!(!once.max_elapsed.is_zero());
            if !initial.is_zero() {
                prop_assert_eq!(once.initial_interval, initial);
            }
        }
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.auth_token.is_none());
        assert!(!config.retry.enabled);
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfigBuilder::new()
            .base_url("https://nakadi.example.com")
            .auth_token("secret")
            .timeout(Duration::from_secs(5))
            .retry(RetryPolicy::enabled())
            .default_header("X-Flow-Id", "abc")
            .unwrap()
            .build();

        assert_eq!(config.base_url, "https://nakadi.example.com");
        assert_eq!(
            config.auth_token.as_ref().map(|t| t.expose_secret()),
            Some("secret")
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.retry.enabled);
        assert_eq!(config.default_headers.get("x-flow-id").unwrap(), "abc");
    }

    #[test]
    fn test_invalid_default_header() {
        let result = ClientConfigBuilder::new().default_header("bad header", "v");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_config_merge() {
        let base = ClientConfigBuilder::new()
            .auth_token("token")
            .retry(RetryPolicy::default().with_max_interval(Duration::from_secs(3)))
            .build();
        let overrides = ClientConfigBuilder::new()
            .base_url("https://other:8080")
            .retry(RetryPolicy::enabled())
            .build();

        let merged = base.merge(overrides);
        assert_eq!(merged.base_url, "https://other:8080");
        assert!(merged.auth_token.is_some());
        assert!(merged.retry.enabled);
        assert_eq!(merged.retry.max_interval, Duration::from_secs(3));
        assert_eq!(merged.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_merge_cannot_disable_retry() {
        let base = ClientConfigBuilder::new().retry(RetryPolicy::enabled()).build();
        let overrides = ClientConfigBuilder::new().retry(RetryPolicy::default()).build();

        let merged = base.merge(overrides);
        assert!(merged.retry.enabled);
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_variables() {
        temp_env::with_vars(
            [
                ("NAKADI_URL", Some("https://nakadi.env:8443")),
                ("NAKADI_TOKEN", Some("env-token")),
                ("NAKADI_TIMEOUT", Some("12")),
                ("NAKADI_RETRY", Some("true")),
                ("NAKADI_INITIAL_RETRY_INTERVAL_MS", Some("50")),
                ("NAKADI_MAX_RETRY_INTERVAL_MS", Some("400")),
                ("NAKADI_MAX_ELAPSED_TIME_SECS", Some("3")),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert_eq!(config.base_url, "https://nakadi.env:8443");
                assert!(config.auth_token.is_some());
                assert_eq!(config.timeout, Duration::from_secs(12));
                assert_eq!(
                    config.retry,
                    RetryPolicy {
                        enabled: true,
                        initial_interval: Duration::from_millis(50),
                        max_interval: Duration::from_millis(400),
                        max_elapsed: Duration::from_secs(3),
                    }
                );
            },
        );
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_rejects_malformed_values() {
        temp_env::with_vars(
            [
                ("NAKADI_RETRY", Some("sometimes")),
                ("NAKADI_URL", None),
            ],
            || {
                let err = ClientConfig::from_env().unwrap_err();
                assert!(matches!(err, Error::Config(ref msg) if msg.contains("NAKADI_RETRY")));
            },
        );
    }
}
