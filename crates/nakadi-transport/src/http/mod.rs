//! HTTP transport implementation
//!
//! Provides a reqwest-backed client that implements the [`Transport`](crate::Transport)
//! trait. Retries are deliberately left to the caller.

pub mod client;

pub use client::{HttpTransport, HttpTransportConfig};
