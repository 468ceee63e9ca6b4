//! Common test utilities and helpers

use nakadi::{Client, RetryPolicy, Subscription};
use rstest::fixture;
use std::path::Path;
use wiremock::MockServer;

/// Id of the subscription in `subscription.json`
#[allow(dead_code)]
pub const SUBSCRIPTION_ID: &str = "7dd69d58-7f20-11e7-9748-133d6a0dbfb3";

/// Load a JSON fixture from `tests/fixtures`
#[allow(dead_code)]
pub fn load_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture '{}' from {:?}: {}", name, path, e))
}

/// The subscription stored in `subscription.json`
#[allow(dead_code)]
pub fn fixture_subscription() -> Subscription {
    serde_json::from_str(&load_fixture("subscription")).expect("Invalid subscription fixture")
}

/// Client without retries pointed at `server`
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .base_url(server.uri())
        .build()
        .expect("Failed to build client")
}

/// Client with retries enabled and a short budget pointed at `server`
#[allow(dead_code)]
pub fn retrying_client_for(server: &MockServer) -> Client {
    Client::builder()
        .base_url(server.uri())
        .retry(
            RetryPolicy::enabled()
                .with_initial_interval(std::time::Duration::from_millis(5))
                .with_max_interval(std::time::Duration::from_millis(20))
                .with_max_elapsed(std::time::Duration::from_millis(200)),
        )
        .build()
        .expect("Failed to build client")
}

/// A started mock broker
#[fixture]
pub async fn broker() -> MockServer {
    MockServer::start().await
}
