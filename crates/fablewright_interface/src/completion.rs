//! The text-completion service contract.

use async_trait::async_trait;
use fablewright_core::CompletionRequest;
use fablewright_error::FablewrightResult;
use std::sync::Arc;

/// An opaque LLM text-completion backend.
///
/// Implementations return the raw completion text. Network failures,
/// timeouts and empty responses surface as `ProviderError`; the orchestrator
/// decides whether to retry.
#[async_trait]
pub trait TextCompletionService: Send + Sync {
    /// Complete the request, returning the raw response text.
    async fn complete(&self, request: &CompletionRequest) -> FablewrightResult<String>;

    /// Provider name (e.g., "anthropic", "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: TextCompletionService + ?Sized> TextCompletionService for Box<T> {
    async fn complete(&self, request: &CompletionRequest) -> FablewrightResult<String> {
        (**self).complete(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T: TextCompletionService + ?Sized> TextCompletionService for Arc<T> {
    async fn complete(&self, request: &CompletionRequest) -> FablewrightResult<String> {
        (**self).complete(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
