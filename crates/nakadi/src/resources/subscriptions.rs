//! Subscriptions API endpoint

use crate::client::Client;
use crate::config::RetryPolicy;
use crate::error::{Error, Result};
use crate::http::Executor;
use crate::http::response::{check_status, decode_json};
use crate::types::{Subscription, SubscriptionFilter, SubscriptionList};
use http::Method;
use tokio_util::sync::CancellationToken;

const COLLECTION: &str = "subscriptions";

const GET_CONTEXT: &str = "unable to request subscription";
const LIST_CONTEXT: &str = "unable to request subscriptions";
const CREATE_CONTEXT: &str = "unable to create subscription";
const DELETE_CONTEXT: &str = "unable to delete subscription";

/// Subscriptions API resource.
///
/// Manages subscriptions on the broker. Every operation is a single logical
/// call: with retries enabled, attempts that fail to reach the broker are
/// repeated with exponential backoff until the policy's time budget is spent.
///
/// # Example
///
/// ```rust,no_run
/// use nakadi::{Client, RetryPolicy, Subscription, Subscriptions};
///
/// # async fn example() -> nakadi::Result<()> {
/// let client = Client::builder().base_url("http://localhost:8080").build()?;
/// let subscriptions = Subscriptions::new(&client, Some(&RetryPolicy::enabled()));
///
/// let created = subscriptions
///     .create(&Subscription::new("order-service", ["order.created"]))
///     .await?;
/// let id = created.id.unwrap_or_default();
///
/// let fetched = subscriptions.get(&id).await?;
/// assert_eq!(fetched.owning_application, "order-service");
///
/// subscriptions.delete(&id).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Subscriptions {
    client: Client,
    executor: Executor,
}

impl Subscriptions {
    /// Create a subscriptions API for `client`.
    ///
    /// `retry` is resolved against the defaults; `None` disables retries.
    pub fn new(client: &Client, retry: Option<&RetryPolicy>) -> Self {
        Self {
            client: client.clone(),
            executor: Executor::new(client.transport(), RetryPolicy::resolve(retry)),
        }
    }

    /// Bind `cancel` to every subsequent operation.
    ///
    /// Once the token fires, in-flight attempts are abandoned, pending retry
    /// waits end early and new operations fail with [`Error::Cancelled`].
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            client: self.client.clone(),
            executor: self.executor.clone().with_cancellation(cancel),
        }
    }

    /// Effective retry policy.
    pub fn retry_policy(&self) -> &RetryPolicy {
        self.executor.retry_policy()
    }

    /// Get the subscription with the given id.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] for an empty id; [`Error::Remote`] with
    /// status 404 when the subscription does not exist.
    pub async fn get(&self, id: &str) -> Result<Subscription> {
        require_id(id)?;
        let request = self.client.request(Method::GET, &[COLLECTION, id])?;
        self.executor
            .execute(GET_CONTEXT, request, |context, response| {
                decode_json(context, response, &[200, 201])
            })
            .await
    }

    /// List all subscriptions in the order returned by the broker.
    pub async fn list(&self) -> Result<Vec<Subscription>> {
        self.list_with(&SubscriptionFilter::default()).await
    }

    /// List subscriptions matching `filter`.
    pub async fn list_with(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>> {
        let request = self
            .client
            .request(Method::GET, &[COLLECTION])?
            .query(&filter.query_pairs());
        self.executor
            .execute(LIST_CONTEXT, request, |context, response| {
                decode_json::<SubscriptionList>(context, response, &[200, 201]).map(|list| list.items)
            })
            .await
    }

    /// Create a subscription and return the broker's record of it.
    ///
    /// The returned subscription carries the broker-assigned id.
    pub async fn create(&self, subscription: &Subscription) -> Result<Subscription> {
        let request = self
            .client
            .request(Method::POST, &[COLLECTION])?
            .json(subscription)?;
        self.executor
            .execute(CREATE_CONTEXT, request, |context, response| {
                decode_json(context, response, &[200, 201])
            })
            .await
    }

    /// Delete the subscription with the given id.
    pub async fn delete(&self, id: &str) -> Result<()> {
        require_id(id)?;
        let request = self.client.request(Method::DELETE, &[COLLECTION, id])?;
        self.executor
            .execute(DELETE_CONTEXT, request, |context, response| {
                check_status(context, response, &[204])
            })
            .await
    }
}

fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidRequest(
            "subscription id cannot be empty".to_string(),
        ));
    }
    Ok(())
}
