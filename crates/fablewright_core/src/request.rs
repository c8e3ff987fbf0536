//! Requests sent to the text-completion service.

use serde::{Deserialize, Serialize};

/// A single completion call: system prompt, user prompt and sampling limits.
///
/// # Examples
///
/// ```
/// use fablewright_core::CompletionRequest;
///
/// let request = CompletionRequest::builder()
///     .system_prompt("You are a novelist.")
///     .user_prompt("Write the opening page.")
///     .max_tokens(4096u32)
///     .temperature(0.8f32)
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.max_tokens(), 4096);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[builder(setter(into))]
pub struct CompletionRequest {
    /// Instructions establishing the writer's role and rules
    system_prompt: String,
    /// The assembled context and task
    user_prompt: String,
    /// Output token ceiling
    max_tokens: u32,
    /// Sampling temperature
    temperature: f32,
}

impl CompletionRequest {
    /// Creates a new request builder.
    pub fn builder() -> CompletionRequestBuilder {
        CompletionRequestBuilder::default()
    }

    /// Copy of this request with extra text appended to the user prompt.
    pub fn with_appended(&self, extra: &str) -> Self {
        let mut next = self.clone();
        if !extra.trim().is_empty() {
            next.user_prompt.push_str("\n\n");
            next.user_prompt.push_str(extra.trim());
        }
        next
    }
}
