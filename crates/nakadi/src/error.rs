//! Error types for the Nakadi client
//!
//! Every failed operation produces exactly one [`Error`]. The variants follow
//! the classification of an attempt: the exchange never completed
//! ([`Error::Connection`]), a response arrived but could not be understood
//! ([`Error::Decode`]), or the broker answered with a problem body
//! ([`Error::Remote`]). Retry and cancellation outcomes wrap or replace these.

use crate::types::ProblemDetail;
use nakadi_transport::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail with a Nakadi client error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Nakadi client.
#[derive(Debug, Error)]
pub enum Error {
    /// No response could be obtained (refused, DNS, timeout, unreadable body).
    ///
    /// The only retryable variant.
    #[error("{context}: {source}")]
    Connection {
        /// Operation that failed
        context: &'static str,
        /// Underlying transport failure
        #[source]
        source: TransportError,
    },

    /// A response arrived but its body did not have the expected shape.
    #[error("{context}: unable to decode response body (status {status}): {reason}")]
    Decode {
        /// Operation that failed
        context: &'static str,
        /// HTTP status of the response
        status: u16,
        /// Parser message, or why the status was rejected
        reason: String,
    },

    /// The broker rejected the request with a problem body.
    #[error("{context}: {}", .problem.detail)]
    Remote {
        /// Operation that failed
        context: &'static str,
        /// HTTP status of the response
        status: u16,
        /// Decoded problem body
        problem: ProblemDetail,
    },

    /// Transient failures persisted until the retry budget ran out.
    #[error("retries exhausted after {attempts} attempts in {elapsed:?}: {source}")]
    RetryExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Time spent across attempts and waits
        elapsed: Duration,
        /// Last transient failure
        #[source]
        source: Box<Error>,
    },

    /// The operation was cancelled before it could complete.
    #[error("{context}: cancelled after {attempts} attempts")]
    Cancelled {
        /// Operation that was cancelled
        context: &'static str,
        /// Attempts started before cancellation
        attempts: u32,
    },

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error is retryable.
    ///
    /// Only failures to complete the exchange are. A problem response, even a
    /// 5xx, is the broker's answer and is returned as is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    /// HTTP status of the response this error was built from, if any.
    ///
    /// For [`Error::RetryExhausted`] this looks through to the wrapped error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Decode { status, .. } | Error::Remote { status, .. } => Some(*status),
            Error::RetryExhausted { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Problem body returned by the broker, if any.
    pub fn problem(&self) -> Option<&ProblemDetail> {
        match self {
            Error::Remote { problem, .. } => Some(problem),
            _ => None,
        }
    }

    /// Whether the broker reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Remote { status: 404, .. })
    }

    /// Whether the operation ended because of cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled { .. })
    }
}
