//! HTTP request builder

use crate::error::{Error, Result};
use crate::observability::RequestMetadata;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use http::Method;
use nakadi_transport::HttpRequest;
use serde::Serialize;
use url::Url;

/// A request against the broker, reusable across retry attempts.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    /// Create a request for `base` extended by `segments`.
    ///
    /// Each segment is percent-encoded on its own, so an id containing `/`
    /// stays a single path segment.
    pub fn new(method: Method, base: &Url, segments: &[&str]) -> Result<Self> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(format!("{base} cannot be a base URL")))?
            .pop_if_empty()
            .extend(segments);

        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    /// Append query parameters.
    pub fn query(mut self, pairs: &[(&str, &str)]) -> Self {
        if !pairs.is_empty() {
            self.url.query_pairs_mut().extend_pairs(pairs);
        }
        self
    }

    /// Add every header of `headers`, replacing existing values.
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        for (key, value) in headers {
            self.headers.insert(key.clone(), value.clone());
        }
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// Full request URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Logging metadata for this request.
    pub fn metadata(&self) -> RequestMetadata {
        let metadata = RequestMetadata::new(self.method.as_str(), self.url.path());
        match &self.body {
            Some(body) => metadata.with_body_size(body.len()),
            None => metadata,
        }
    }

    /// Transport-level request for one attempt.
    ///
    /// Headers whose values are not visible ASCII are dropped.
    pub fn to_transport(&self) -> HttpRequest {
        let mut request = HttpRequest::new(self.method.as_str(), self.url().as_str());
        for (key, value) in &self.headers {
            if let Ok(value) = value.to_str() {
                request = request.with_header(key.as_str(), value);
            }
        }
        if let Some(body) = &self.body {
            request = request.with_body(body.clone());
        }
        request
    }
}
