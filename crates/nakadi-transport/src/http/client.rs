//! HTTP transport client implementation

use crate::error::{Result, TransportError};
use crate::traits::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// HTTP transport implementation
///
/// A thin wrapper over a pooled reqwest client. It performs exactly one
/// exchange per call and maps reqwest failures onto [`TransportError`].
/// The `User-Agent` comes from the request headers, not from this client.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Arc<ReqwestClient>,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new HTTP transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Create a new HTTP transport with custom configuration
    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host);

        if config.http2_prior_knowledge {
            builder = builder.http2_prior_knowledge();
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            timeout: config.timeout,
        })
    }

    /// Per-request timeout in effect
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn method(request: &HttpRequest) -> Result<reqwest::Method> {
        reqwest::Method::from_bytes(request.method.to_uppercase().as_bytes()).map_err(|_| {
            TransportError::Http(format!("Unsupported HTTP method: {}", request.method))
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_http(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = Self::method(&request)?;
        let mut req = self.client.request(method, &request.url);

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await.map_err(|e| {
            let err = TransportError::from(e);
            tracing::debug!(url = %request.url, kind = err.kind(), error = %err, "HTTP exchange failed");
            err
        })?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());

        let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

/// Flatten response headers into one entry per name.
///
/// Repeated fields are joined with `", "`. Values that are not visible ASCII
/// are skipped.
fn collect_headers(map: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    let mut headers: HashMap<String, String> = HashMap::new();
    for (key, value) in map {
        let Ok(value) = value.to_str() else {
            continue;
        };
        headers
            .entry(key.to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    headers
}

/// HTTP transport configuration
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Speak HTTP/2 without negotiation
    pub http2_prior_knowledge: bool,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
            http2_prior_knowledge: false,
        }
    }
}
