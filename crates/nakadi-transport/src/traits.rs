//! Transport trait and the request/response values it exchanges.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// HTTP request handed to a transport
///
/// Represents an HTTP request to be sent via the [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,

    /// Request URL
    pub url: String,

    /// Request headers
    pub headers: HashMap<String, String>,

    /// Request body (optional)
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Create a new HTTP request
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header to the request
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP response
///
/// Whatever status the server answered with; classification happens above
/// this layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers, one entry per name with repeated fields joined by
    /// `", "`
    pub headers: HashMap<String, String>,

    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new HTTP response
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the body is empty or whitespace only
    pub fn is_body_blank(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Parse response body as JSON
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if the body is not valid JSON
    /// for `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    /// Get a header value by name (case-insensitive)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The "send request, receive status+headers+body" capability.
///
/// Implementations must be safe to share between concurrent operations.
/// Returning `Ok` means a response was received, whatever its status; `Err`
/// means the exchange could not be completed.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an HTTP request and receive a response
    async fn send_http(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Name used in logs
    fn name(&self) -> &'static str {
        "custom"
    }
}
