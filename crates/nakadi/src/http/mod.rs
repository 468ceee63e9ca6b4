//! HTTP layer between the resource APIs and the transport
//!
//! Requests are built once per operation, sent once per attempt by the
//! [`Executor`], and each response is classified by the `response` helpers.

pub(crate) mod executor;
pub(crate) mod request;
pub(crate) mod response;

pub(crate) use executor::Executor;
pub(crate) use request::RequestBuilder;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method};
