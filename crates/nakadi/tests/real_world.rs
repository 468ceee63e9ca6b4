//! Real-world integration tests against a running Nakadi broker
//!
//! ## Setup
//!
//! Start a broker (for example the `nakadi` docker-compose setup) and make
//! sure an event type exists for the tests to subscribe to:
//!
//! ```bash
//! export NAKADI_URL="http://localhost:8080"
//! export NAKADI_TEST_EVENT_TYPE="test-event.data"
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p nakadi --test real_world -- --ignored --test-threads=1
//! ```
//!
//! Tests use `#[ignore]` to prevent accidental execution and clean up the
//! subscriptions they create.

#![cfg(feature = "env")]

use nakadi::{Client, ClientConfig, Error, RetryPolicy, Subscription, Subscriptions};
use std::time::Duration;

fn event_type() -> String {
    std::env::var("NAKADI_TEST_EVENT_TYPE").unwrap_or_else(|_| "test-event.data".to_string())
}

fn client() -> Client {
    let mut config = ClientConfig::from_env().expect("Invalid NAKADI_* environment");
    config.connect_timeout = Duration::from_secs(1);
    Client::from_config(config).expect("Failed to build client")
}

async fn create_all(api: &Subscriptions, owners: &[&str]) -> Vec<Subscription> {
    let mut created = Vec::new();
    for owner in owners {
        let subscription = Subscription::new(*owner, [event_type()]);
        created.push(api.create(&subscription).await.expect("create failed"));
    }
    created
}

async fn delete_all(api: &Subscriptions, subscriptions: &[Subscription]) {
    for subscription in subscriptions {
        if let Some(id) = &subscription.id {
            let _ = api.delete(id).await;
        }
    }
}

#[tokio::test]
#[ignore]
async fn real_world_get() {
    let client = client();
    let api = Subscriptions::new(&client, Some(&RetryPolicy::enabled()));
    let created = create_all(&api, &["test-app"]).await;

    let err = api.get("does-not-exist").await.unwrap_err();
    assert!(err.to_string().contains("does not exist"), "{err}");

    let id = created[0].id.as_deref().expect("created without id");
    let fetched = api.get(id).await.expect("get failed");
    assert_eq!(fetched.event_types, created[0].event_types);
    assert_eq!(fetched.owning_application, created[0].owning_application);
    assert_eq!(fetched.consumer_group.as_deref(), Some("default"));

    delete_all(&api, &created).await;
}

#[tokio::test]
#[ignore]
async fn real_world_list() {
    let client = client();
    let api = Subscriptions::new(&client, None);
    let created = create_all(&api, &["test-app", "test-app2"]).await;

    let fetched = api.list().await.expect("list failed");
    for subscription in &created {
        assert!(fetched.iter().any(|s| s.id == subscription.id));
    }

    delete_all(&api, &created).await;
}

#[tokio::test]
#[ignore]
async fn real_world_create() {
    let client = client();
    let api = Subscriptions::new(&client, None);

    let err = api
        .create(&Subscription::new("test-api", Vec::<String>::new()))
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("unable to create subscription"), "{err}");
    assert!(matches!(err, Error::Remote { .. }));

    let created = api
        .create(&Subscription::new("test-app", [event_type()]))
        .await
        .expect("create failed");
    assert!(created.id.is_some());
    assert_eq!(created.owning_application, "test-app");
    assert_eq!(created.event_types, vec![event_type()]);

    delete_all(&api, &[created]).await;
}

#[tokio::test]
#[ignore]
async fn real_world_delete() {
    let client = client();
    let api = Subscriptions::new(&client, None);
    let created = create_all(&api, &["test-app"]).await;

    let err = api.delete("does-not-exist").await.unwrap_err();
    assert!(err.to_string().contains("does not exist"), "{err}");

    let id = created[0].id.as_deref().expect("created without id");
    api.delete(id).await.expect("delete failed");

    let err = api.delete(id).await.unwrap_err();
    assert!(err.is_not_found());
}
