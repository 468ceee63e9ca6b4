//! Transport error types

use std::fmt;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Failure to complete a request/response exchange.
///
/// Any of these means no usable response was received, which is why the
/// subscription API treats all of them as transient.
#[derive(Debug)]
pub enum TransportError {
    /// Connection could not be established (refused, DNS, TLS)
    Connection(String),

    /// No response arrived within the configured timeout
    Timeout,

    /// The request could not be built or the response body could not be read
    Http(String),
}

impl TransportError {
    /// Short machine-friendly name of the failure kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Timeout => "timeout",
            Self::Http(_) => "http",
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "Connection error: {}", msg),
            Self::Timeout => write!(f, "Timeout"),
            Self::Http(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}
