//! Problem responses returned by the broker on failure

use serde::{Deserialize, Serialize};
use std::fmt;

/// An `application/problem+json` body.
///
/// Only `detail` is required; the remaining RFC 7807 members are kept when the
/// broker sends them and anything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetail {
    /// Human-readable explanation of this occurrence
    pub detail: String,

    /// Short summary of the problem type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTTP status as reported inside the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// URI reference identifying the problem type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,

    /// URI reference identifying this occurrence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetail {
    /// A problem carrying only a detail message.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            title: None,
            status: None,
            problem_type: None,
            instance: None,
        }
    }
}

impl fmt::Display for ProblemDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}
