//! Anthropic Messages API.

mod client;
mod dto;

pub use client::AnthropicClient;
pub use dto::{AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse};
