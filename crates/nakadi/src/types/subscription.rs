//! Subscription resource types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Nakadi subscription.
///
/// The broker assigns `id` (and `created_at`) on creation, so a subscription
/// built locally for [`Subscriptions::create`](crate::resources::Subscriptions::create)
/// leaves both unset and they are omitted from the request body.
///
/// # Example
///
/// ```rust
/// use nakadi::{ReadFrom, Subscription};
///
/// let subscription = Subscription::new("order-service", ["order.created"])
///     .with_consumer_group("billing")
///     .with_read_from(ReadFrom::Begin);
///
/// assert!(subscription.id.is_none());
/// assert_eq!(subscription.event_types, vec!["order.created".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Subscription {
    /// Broker-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Application owning the subscription
    pub owning_application: String,

    /// Event types the subscription reads from
    #[serde(default)]
    pub event_types: Vec<String>,

    /// Consumer group; the broker uses `"default"` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_group: Option<String>,

    /// Where a new subscription starts reading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_from: Option<ReadFrom>,

    /// Creation timestamp set by the broker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Subscription {
    /// Create a subscription to `event_types` owned by `owning_application`.
    pub fn new<I, S>(owning_application: impl Into<String>, event_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            owning_application: owning_application.into(),
            event_types: event_types.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Set the consumer group.
    pub fn with_consumer_group(mut self, consumer_group: impl Into<String>) -> Self {
        self.consumer_group = Some(consumer_group.into());
        self
    }

    /// Set the starting position.
    pub fn with_read_from(mut self, read_from: ReadFrom) -> Self {
        self.read_from = Some(read_from);
        self
    }
}

/// Starting position of a new subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFrom {
    /// Oldest available event
    Begin,
    /// Only events published after creation
    End,
    /// Explicit initial cursors
    Cursors,
}

/// Query filters for listing subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    /// Only subscriptions owned by this application
    pub owning_application: Option<String>,
    /// Only subscriptions reading all of these event types
    pub event_types: Vec<String>,
}

impl SubscriptionFilter {
    /// Filter by owning application.
    pub fn owning_application(mut self, owning_application: impl Into<String>) -> Self {
        self.owning_application = Some(owning_application.into());
        self
    }

    /// Add an event type filter.
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_types.push(event_type.into());
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(self.event_types.len() + 1);
        if let Some(app) = &self.owning_application {
            pairs.push(("owning_application", app.as_str()));
        }
        for event_type in &self.event_types {
            pairs.push(("event_type", event_type.as_str()));
        }
        pairs
    }
}

/// `GET /subscriptions` body.
#[derive(Debug, Deserialize)]
pub(crate) struct SubscriptionList {
    pub(crate) items: Vec<Subscription>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_new_subscription_omits_broker_fields() {
        let subscription = Subscription::new("test-app", ["test-event.data"]);
        let value = serde_json::to_value(&subscription).unwrap();

        assert_eq!(
            value,
            json!({
                "owning_application": "test-app",
                "event_types": ["test-event.data"]
            })
        );
    }

    #[test]
    fn test_full_subscription_deserializes() {
        let subscription: Subscription = serde_json::from_value(json!({
            "id": "7dd69d58-7f20-11e7-9748-133d6a0dbfb3",
            "owning_application": "test-app",
            "event_types": ["test-event.data"],
            "consumer_group": "default",
            "read_from": "end",
            "created_at": "2017-08-10T13:13:09.407Z",
            "authorization": {"admins": [], "readers": []}
        }))
        .unwrap();

        assert_eq!(
            subscription.id.as_deref(),
            Some("7dd69d58-7f20-11e7-9748-133d6a0dbfb3")
        );
        assert_eq!(subscription.consumer_group.as_deref(), Some("default"));
        assert_eq!(subscription.read_from, Some(ReadFrom::End));
        assert!(subscription.created_at.is_some());
    }

    #[test]
    fn test_filter_query_pairs() {
        let filter = SubscriptionFilter::default()
            .owning_application("test-app")
            .event_type("a")
            .event_type("b");

        assert_eq!(
            filter.query_pairs(),
            vec![
                ("owning_application", "test-app"),
                ("event_type", "a"),
                ("event_type", "b"),
            ]
        );
        assert!(SubscriptionFilter::default().query_pairs().is_empty());
    }
}
