//! Text-completion provider clients for Fablewright.
//!
//! Each client implements [`TextCompletionService`](fablewright_interface::TextCompletionService)
//! over a provider's HTTP API:
//!
//! - [`AnthropicClient`] for the Anthropic Messages API
//! - [`OpenAICompatibleClient`] for any `/chat/completions` endpoint
//!
//! [`build_service`] picks a client from the `[provider]` configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anthropic;
mod factory;
mod openai_compat;

pub use anthropic::{
    AnthropicClient, AnthropicContentBlock, AnthropicMessage, AnthropicRequest,
    AnthropicResponse,
};
pub use factory::{ProviderKind, build_service, build_service_with_key};
pub use openai_compat::{ChatMessage, ChatRequest, ChatResponse, OpenAICompatibleClient};
