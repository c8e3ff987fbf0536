//! Calling the completion service with a timeout and one bounded retry.

use fablewright_core::CompletionRequest;
use fablewright_error::{
    FablewrightError, FablewrightErrorKind, FablewrightResult, ProviderError, ProviderErrorKind,
    RetryableError,
};
use fablewright_interface::TextCompletionService;
use std::time::Duration;
use tokio_retry2::{Retry, RetryError, strategy::FixedInterval, strategy::jitter};
use tracing::{debug, instrument, warn};

fn is_transient(error: &FablewrightError) -> bool {
    match error.kind() {
        FablewrightErrorKind::Provider(e) => e.is_retryable(),
        _ => false,
    }
}

async fn complete_once(
    service: &dyn TextCompletionService,
    request: &CompletionRequest,
    timeout: Duration,
) -> FablewrightResult<String> {
    let text = tokio::time::timeout(timeout, service.complete(request))
        .await
        .map_err(|_| ProviderError::new(ProviderErrorKind::Timeout(timeout.as_secs())))??;

    if text.trim().is_empty() {
        return Err(ProviderError::new(ProviderErrorKind::EmptyResponse).into());
    }
    Ok(text)
}

/// Call the service, retrying transient provider failures.
///
/// Each call is bounded by `timeout`; a blank response counts as a transient
/// failure. After `retries` extra tries the last error is returned. Errors
/// that are not transient are returned immediately.
///
/// # Errors
///
/// Returns the provider error of the final try.
#[instrument(
    skip(service, request),
    fields(
        provider = service.provider_name(),
        model = service.model_name(),
        max_tokens = *request.max_tokens()
    )
)]
pub async fn complete_with_retry(
    service: &dyn TextCompletionService,
    request: &CompletionRequest,
    timeout: Duration,
    retries: usize,
    backoff: Duration,
) -> FablewrightResult<String> {
    let strategy = FixedInterval::new(backoff).map(jitter).take(retries);

    let text = Retry::spawn(strategy, || async move {
        match complete_once(service, request, timeout).await {
            Ok(text) => Ok(text),
            Err(e) if is_transient(&e) => {
                warn!(error = %e, "Completion failed, retrying");
                Err(RetryError::Transient {
                    err: e,
                    retry_after: None,
                })
            }
            Err(e) => Err(RetryError::Permanent(e)),
        }
    })
    .await?;

    debug!(response_len = text.len(), "Completion received");
    Ok(text)
}
