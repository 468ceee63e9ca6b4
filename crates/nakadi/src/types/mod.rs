//! Wire types for the subscription API

mod problem;
mod subscription;

pub use problem::ProblemDetail;
pub(crate) use subscription::SubscriptionList;
pub use subscription::{ReadFrom, Subscription, SubscriptionFilter};
