//! # Nakadi client
//!
//! Rust client for the subscription API of the
//! [Nakadi](https://nakadi.io) event broker:
//! - Get, list, create and delete subscriptions
//! - Failures classified into connection, decode and problem errors
//! - Optional retries with capped exponential backoff and a time budget
//! - Cancellation via [`CancellationToken`]
//! - Pluggable transport (reqwest by default)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nakadi::{Client, RetryPolicy, Subscription};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder()
//!         .base_url("http://localhost:8080")
//!         .retry(RetryPolicy::enabled())
//!         .build()?;
//!
//!     let created = client
//!         .subscriptions()
//!         .create(&Subscription::new("order-service", ["order.created"]))
//!         .await?;
//!
//!     println!("created {:?}", created.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! ```rust,no_run
//! # async fn example(client: nakadi::Client) {
//! match client.subscriptions().get("unknown").await {
//!     Ok(subscription) => println!("{subscription:?}"),
//!     Err(err) if err.is_not_found() => println!("gone: {err}"),
//!     Err(err) => eprintln!("failed: {err}"),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder, RetryDefaults, RetryPolicy};
pub use error::{Error, Result};
pub use resources::Subscriptions;
pub use types::*;

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod resources;
pub mod types;

// Re-export key dependencies for convenience
pub use async_trait::async_trait;
pub use nakadi_transport::{HttpRequest, HttpResponse, Transport, TransportError};
pub use tokio_util::sync::CancellationToken;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use nakadi::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        CancellationToken, Client, ClientConfig, Error, Result, RetryPolicy, Subscriptions,
        types::{ProblemDetail, ReadFrom, Subscription, SubscriptionFilter},
    };
}

/// SDK version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::DEFAULT_BASE_URL;
