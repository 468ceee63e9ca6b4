//! Structured logging for subscription requests
//!
//! Every attempt sent by the client is logged through this layer: a `debug`
//! event when it leaves, `info` when an operation succeeds, `warn` when an
//! attempt or the whole operation fails. Retry waits are logged by
//! `nakadi-core`.

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// HTTP request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path
    pub path: String,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body_size: None,
        }
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log an attempt being sent
    pub fn log_request(&self, attempt: u32) {
        debug!(
            method = %self.method,
            path = %self.path,
            body_size = self.body_size,
            attempt,
            "Sending HTTP request"
        );
    }

    /// Log an attempt that ended without a usable response
    pub fn log_attempt_failed(&self, attempt: u32, error: &str) {
        warn!(
            method = %self.method,
            path = %self.path,
            attempt,
            error = %error,
            "HTTP attempt failed"
        );
    }
}

/// HTTP response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code, absent when no response was received
    pub status: Option<u16>,
    /// Time elapsed for the operation
    pub elapsed: Duration,
    /// Number of attempts made
    pub attempts: u32,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(status: Option<u16>, elapsed: Duration) -> Self {
        Self {
            status,
            elapsed,
            attempts: 1,
        }
    }

    /// Set the number of attempts
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Log successful operation
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            attempts = self.attempts,
            "HTTP request succeeded"
        );
    }

    /// Log failed operation
    pub fn log_error(&self, request: &RequestMetadata, error: &str) {
        warn!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            error = %error,
            attempts = self.attempts,
            "HTTP request failed"
        );
    }
}

/// Timer for measuring operation duration
///
/// Uses the tokio clock so durations agree with retry budgets under a paused
/// test runtime.
#[derive(Debug)]
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Install a `tracing-subscriber` formatter filtered by `RUST_LOG`.
///
/// Falls back to `info` for this crate when `RUST_LOG` is unset. Calling it
/// more than once is harmless.
#[cfg(feature = "trace")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("nakadi=info,nakadi_core=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
