use crate::openai_compat::{ChatMessage, ChatRequest, ChatResponse};
use async_trait::async_trait;
use fablewright_core::CompletionRequest;
use fablewright_error::{
    FablewrightResult, GenerationError, GenerationErrorKind, ProviderError, ProviderErrorKind,
};
use fablewright_interface::TextCompletionService;
use reqwest::Client;
use tracing::{debug, error, instrument, warn};

/// Client for any OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    provider: &'static str,
}

impl OpenAICompatibleClient {
    /// Default base URL for OpenAI itself.
    pub const OPENAI_BASE_URL: &'static str = "https://api.openai.com/v1";

    /// Creates a new client.
    ///
    /// `base_url` is the API root; `/chat/completions` is appended.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        provider: &'static str,
    ) -> Self {
        debug!(provider, "Creating new OpenAI-compatible client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            provider,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Sends a chat request.
    #[instrument(skip(self, request), fields(provider = self.provider, model = %request.model()))]
    pub async fn send(&self, request: &ChatRequest) -> FablewrightResult<ChatResponse> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send chat request");
                ProviderError::new(ProviderErrorKind::Unreachable(format!("Request failed: {}", e)))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Chat API returned error");
            return Err(ProviderError::new(ProviderErrorKind::Api {
                status: status.as_u16(),
                message: body,
            })
            .into());
        }

        response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse chat response");
            ProviderError::new(ProviderErrorKind::InvalidResponse(format!(
                "Failed to parse response: {}",
                e
            )))
            .into()
        })
    }
}

#[async_trait]
impl TextCompletionService for OpenAICompatibleClient {
    #[instrument(skip(self, request), fields(provider = self.provider, model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> FablewrightResult<String> {
        let body = ChatRequest::builder()
            .model(self.model.as_str())
            .messages(vec![
                ChatMessage::new("system", request.system_prompt().as_str()),
                ChatMessage::new("user", request.user_prompt().as_str()),
            ])
            .max_tokens(*request.max_tokens())
            .temperature(*request.temperature())
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::RequestBuild(e.to_string())))?;

        let response = self.send(&body).await?;
        if response.is_truncated() {
            warn!(max_tokens = *request.max_tokens(), "Chat response hit the token ceiling");
        }
        Ok(response.text().unwrap_or_default().to_string())
    }

    fn provider_name(&self) -> &'static str {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
