//! Transport abstraction layer for the Nakadi client
//!
//! The subscription API never talks to the network directly. It hands an
//! [`HttpRequest`] to a [`Transport`] and receives an [`HttpResponse`] (status,
//! headers, body) or a [`TransportError`] when no response could be obtained.
//!
//! # Architecture
//!
//! - **Transport trait**: the "send request, receive response" capability
//! - **HTTP transport**: default implementation via reqwest
//! - **Error handling**: every failure to complete an exchange is a
//!   [`TransportError`]; status codes are never errors at this layer
//!
//! # Usage
//!
//! ```no_run
//! use nakadi_transport::{HttpRequest, HttpTransport, Transport};
//!
//! # async fn example() -> nakadi_transport::Result<()> {
//! let transport = HttpTransport::new()?;
//! let request = HttpRequest::new("GET", "http://localhost:8080/subscriptions");
//! let response = transport.send_http(request).await?;
//! println!("status {}", response.status);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod traits;

pub use error::{Result, TransportError};
pub use http::{HttpTransport, HttpTransportConfig};
pub use traits::{HttpRequest, HttpResponse, Transport};
