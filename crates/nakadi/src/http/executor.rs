//! Attempt and retry loop shared by every resource operation

use super::request::RequestBuilder;
use crate::config::RetryPolicy;
use crate::error::{Error, Result};
use crate::observability::{RequestMetadata, RequestTimer, ResponseMetadata};
use nakadi_core::retry::{RetryError, retry};
use nakadi_transport::{HttpResponse, Transport};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio_util::sync::CancellationToken;

/// Sends requests through a transport under a retry policy.
///
/// With retries disabled an operation is exactly one attempt. With retries
/// enabled only [`Error::Connection`] triggers another attempt; every other
/// outcome ends the operation.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("transport", &self.transport.name())
            .field("retry", &self.retry)
            .finish()
    }
}

impl Executor {
    /// Create an executor. `retry` is resolved against the defaults.
    pub fn new(transport: Arc<dyn Transport>, retry: RetryPolicy) -> Self {
        Self {
            transport,
            retry: retry.with_defaults(),
            cancel: CancellationToken::new(),
        }
    }

    /// Bind a cancellation token to subsequent operations.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Effective retry policy.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Run `request` to completion, classifying each response with `handle`.
    pub async fn execute<T, F>(
        &self,
        context: &'static str,
        request: RequestBuilder,
        handle: F,
    ) -> Result<T>
    where
        F: Fn(&'static str, &HttpResponse) -> Result<T>,
    {
        let metadata = request.metadata();
        let timer = RequestTimer::start();
        let attempts = AtomicU32::new(0);

        let outcome = if self.retry.enabled {
            let backoff = self.retry.backoff();
            retry(&backoff, &self.cancel, Error::is_retryable, |attempt| {
                self.attempt(context, &request, &metadata, &attempts, attempt, &handle)
            })
            .await
            .map_err(|e| match e {
                RetryError::Permanent(err) => err,
                RetryError::Exhausted {
                    last,
                    attempts,
                    elapsed,
                } => Error::RetryExhausted {
                    attempts,
                    elapsed,
                    source: Box::new(last),
                },
                RetryError::Cancelled { attempts } => Error::Cancelled { context, attempts },
            })
        } else if self.cancel.is_cancelled() {
            Err(Error::Cancelled {
                context,
                attempts: 0,
            })
        } else {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(Error::Cancelled { context, attempts: 1 }),
                result = self.attempt(context, &request, &metadata, &attempts, 0, &handle) => result,
            }
        };

        let attempts = attempts.load(Ordering::Relaxed);
        match outcome {
            Ok((status, value)) => {
                ResponseMetadata::new(Some(status), timer.elapsed())
                    .with_attempts(attempts)
                    .log_success(&metadata);
                Ok(value)
            }
            Err(err) => {
                ResponseMetadata::new(err.status(), timer.elapsed())
                    .with_attempts(attempts)
                    .log_error(&metadata, &err.to_string());
                Err(err)
            }
        }
    }

    async fn attempt<T, F>(
        &self,
        context: &'static str,
        request: &RequestBuilder,
        metadata: &RequestMetadata,
        attempts: &AtomicU32,
        attempt: u32,
        handle: &F,
    ) -> Result<(u16, T)>
    where
        F: Fn(&'static str, &HttpResponse) -> Result<T>,
    {
        attempts.fetch_add(1, Ordering::Relaxed);
        metadata.log_request(attempt);

        let response = self
            .transport
            .send_http(request.to_transport())
            .await
            .map_err(|source| {
                let err = Error::Connection { context, source };
                metadata.log_attempt_failed(attempt, &err.to_string());
                err
            })?;

        let value = handle(context, &response)?;
        Ok((response.status, value))
    }
}
