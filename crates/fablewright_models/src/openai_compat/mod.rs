//! OpenAI-compatible `/chat/completions` endpoints.

mod client;
mod dto;

pub use client::OpenAICompatibleClient;
pub use dto::{ChatMessage, ChatRequest, ChatResponse};
