//! Response classification
//!
//! Turns a completed exchange into a typed value or an [`Error`]. Transport
//! failures never reach this module; they are classified by the executor.

use crate::error::{Error, Result};
use crate::types::ProblemDetail;
use nakadi_transport::HttpResponse;
use serde::de::DeserializeOwned;

/// Decode a failure body into [`Error::Remote`], or [`Error::Decode`] when it
/// is not a problem document.
pub fn decode_problem(context: &'static str, status: u16, body: &[u8]) -> Error {
    match serde_json::from_slice::<ProblemDetail>(body) {
        Ok(problem) => Error::Remote {
            context,
            status,
            problem,
        },
        Err(e) => Error::Decode {
            context,
            status,
            reason: e.to_string(),
        },
    }
}

/// Check that `response` has one of the `accepted` statuses.
///
/// Non-success statuses go through [`decode_problem`]. A success status the
/// operation does not expect is a decode failure.
pub fn check_status(context: &'static str, response: &HttpResponse, accepted: &[u16]) -> Result<()> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    if !response.is_success() {
        if response.is_body_blank() {
            return Err(Error::Decode {
                context,
                status: response.status,
                reason: "empty response body".to_string(),
            });
        }
        return Err(decode_problem(context, response.status, &response.body));
    }
    Err(Error::Decode {
        context,
        status: response.status,
        reason: format!("unexpected status, expected one of {accepted:?}"),
    })
}

/// Classify `response` and decode its body as `T`.
pub fn decode_json<T: DeserializeOwned>(
    context: &'static str,
    response: &HttpResponse,
    accepted: &[u16],
) -> Result<T> {
    check_status(context, response, accepted)?;
    response.json().map_err(|e| Error::Decode {
        context,
        status: response.status,
        reason: e.to_string(),
    })
}
