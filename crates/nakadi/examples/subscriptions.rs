//! Example: Subscription lifecycle
//!
//! Creates a subscription, fetches it, lists the subscriptions of the owning
//! application and deletes it again. Ctrl-C cancels whatever is in flight.
//!
//! # Usage
//!
//! ```bash
//! export NAKADI_URL="http://localhost:8080"
//! export NAKADI_RETRY=true
//! export RUST_LOG=nakadi=debug
//! cargo run -p nakadi --example subscriptions --features trace -- test-event.data
//! ```

use nakadi::observability::init_tracing;
use nakadi::{CancellationToken, Client, ClientConfig, ReadFrom, Subscription, SubscriptionFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let event_type = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "test-event.data".to_string());

    let client = Client::from_config(ClientConfig::from_env()?)?;
    println!("=== Nakadi subscriptions at {} ===\n", client.base_url());

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let subscriptions = client.subscriptions().with_cancellation(cancel);

    println!("1. Creating subscription for {event_type}");
    let created = subscriptions
        .create(
            &Subscription::new("nakadi-rust-example", [event_type.as_str()])
                .with_read_from(ReadFrom::End),
        )
        .await?;
    let id = created.id.clone().unwrap_or_default();
    println!("   created {id} at {:?}", created.created_at);

    println!("\n2. Fetching it back");
    let fetched = subscriptions.get(&id).await?;
    println!(
        "   owner={} consumer_group={:?} event_types={:?}",
        fetched.owning_application, fetched.consumer_group, fetched.event_types
    );

    println!("\n3. Listing subscriptions of the example application");
    let filter = SubscriptionFilter::default().owning_application("nakadi-rust-example");
    for subscription in subscriptions.list_with(&filter).await? {
        println!("   - {:?} {:?}", subscription.id, subscription.event_types);
    }

    println!("\n4. Deleting it");
    subscriptions.delete(&id).await?;
    match subscriptions.delete(&id).await {
        Err(err) if err.is_not_found() => println!("   second delete: {err}"),
        other => println!("   unexpected second delete result: {other:?}"),
    }

    Ok(())
}
