//! API resource endpoints

pub mod subscriptions;

pub use subscriptions::Subscriptions;
