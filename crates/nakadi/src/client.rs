//! Main client implementation for the Nakadi API

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use nakadi_transport::{HttpTransport, HttpTransportConfig, Transport};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{
    config::{ClientConfig, RetryPolicy},
    error::{Error, Result},
    http::RequestBuilder,
    resources::Subscriptions,
};

/// Main client for interacting with a Nakadi broker.
///
/// The client holds the broker address, the headers sent with every request,
/// and the transport. It is cheap to clone and safe to share between tasks.
///
/// # Example
///
/// ```rust,no_run
/// use nakadi::Client;
///
/// # async fn example() -> nakadi::Result<()> {
/// let client = Client::new("http://localhost:8080")?;
/// for subscription in client.subscriptions().list().await? {
///     println!("{:?} {}", subscription.id, subscription.owning_application);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: Url,
    headers: HeaderMap,
    retry: RetryPolicy,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("transport", &self.inner.transport.name())
            .field("retry", &self.inner.retry)
            .finish()
    }
}

impl Client {
    /// Create a client for the broker at `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `base_url` is not an http(s) URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(base_url))
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a configuration object, using the reqwest transport.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::with_config(HttpTransportConfig {
            timeout: config.timeout,
            connect_timeout: config.connect_timeout,
            ..HttpTransportConfig::default()
        })
        .map_err(|e| Error::HttpClient(e.to_string()))?;

        Self::from_transport(config, Arc::new(transport))
    }

    /// Create a client that sends every request through `transport`.
    ///
    /// The timeouts in `config` are not applied; they belong to the transport.
    pub fn from_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let headers = default_headers(&config)?;

        tracing::debug!(
            base_url = %base_url,
            transport = transport.name(),
            retry = config.retry.enabled,
            "Nakadi client created"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url,
                headers,
                retry: config.retry,
                transport,
            }),
        })
    }

    /// Access the Subscriptions API using the client's retry policy.
    ///
    /// Use [`Subscriptions::new`] to pick a different policy.
    pub fn subscriptions(&self) -> Subscriptions {
        Subscriptions::new(self, Some(&self.inner.retry))
    }

    /// Broker base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Retry policy configured for this client.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.retry
    }

    pub(crate) fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.inner.transport)
    }

    /// Build a request for `segments` below the base URL with client headers.
    pub(crate) fn request(&self, method: http::Method, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(RequestBuilder::new(method, &self.inner.base_url, segments)?.headers(&self.inner.headers))
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::InvalidUrl("Base URL cannot be empty".to_string()));
    }

    let url = Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::InvalidUrl(format!(
            "Base URL must use http or https, got {}",
            url.scheme()
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(Error::InvalidUrl(format!(
            "Base URL must not carry a query or fragment: {raw}"
        )));
    }
    Ok(url)
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("nakadi-rust/", env!("CARGO_PKG_VERSION"))),
    );

    if let Some(token) = &config.auth_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::Config("auth token is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    for (key, value) in &config.default_headers {
        headers.insert(key.clone(), value.clone());
    }
    Ok(headers)
}

/// Builder for creating a configured Client.
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Set the broker base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the bearer token sent with every request.
    pub fn auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.config.auth_token = Some(SecretString::new(auth_token.into().into_boxed_str()));
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the default retry policy for resource APIs.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Add a custom default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| Error::Config(format!("invalid header name: {key_str}")))?;
        let value: HeaderValue = value_str
            .parse()
            .map_err(|_| Error::Config(format!("invalid header value for {key_str}")))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Use a custom transport instead of the built-in reqwest one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        match self.transport {
            Some(transport) => Client::from_transport(self.config, transport),
            None => Client::from_config(self.config),
        }
    }
}
