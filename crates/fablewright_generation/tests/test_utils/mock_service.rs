//! Scripted completion service for testing.

use async_trait::async_trait;
use fablewright_core::CompletionRequest;
use fablewright_error::{FablewrightResult, ProviderError, ProviderErrorKind};
use fablewright_interface::TextCompletionService;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Behavior configuration for mock responses.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always return the given text
    Success(String),
    /// Always return the specified error
    Error(ProviderErrorKind),
    /// Return a sequence of responses
    Sequence(Vec<MockResponse>),
}

/// A single scripted response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Error(ProviderErrorKind),
    /// Sleep before answering, to trip timeouts
    Stall(Duration, String),
}

/// Completion service that replays scripted responses and records requests.
pub struct MockCompletionService {
    behavior: MockBehavior,
    call_count: Arc<Mutex<usize>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletionService {
    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A service that always answers with `text`.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Success(text.into()))
    }

    /// A service that always fails.
    pub fn new_error(error: ProviderErrorKind) -> Self {
        Self::with_behavior(MockBehavior::Error(error))
    }

    /// A service that answers from a script, failing once it runs out.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self::with_behavior(MockBehavior::Sequence(responses))
    }

    /// Number of times complete() was called.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Every request received, in order.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self, request: &CompletionRequest) -> MockResponse {
        let mut count = self.call_count.lock().unwrap();
        let current = *count;
        *count += 1;
        self.requests.lock().unwrap().push(request.clone());

        match &self.behavior {
            MockBehavior::Success(text) => MockResponse::Success(text.clone()),
            MockBehavior::Error(kind) => MockResponse::Error(kind.clone()),
            MockBehavior::Sequence(responses) => {
                responses.get(current).cloned().unwrap_or_else(|| {
                    MockResponse::Error(ProviderErrorKind::InvalidResponse(format!(
                        "Mock sequence exhausted (call {} beyond {} responses)",
                        current + 1,
                        responses.len()
                    )))
                })
            }
        }
    }
}

#[async_trait]
impl TextCompletionService for MockCompletionService {
    async fn complete(&self, request: &CompletionRequest) -> FablewrightResult<String> {
        tokio::time::sleep(Duration::from_millis(1)).await;
        match self.next_response(request) {
            MockResponse::Success(text) => Ok(text),
            MockResponse::Error(kind) => Err(ProviderError::new(kind).into()),
            MockResponse::Stall(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
