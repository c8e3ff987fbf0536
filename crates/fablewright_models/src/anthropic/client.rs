use crate::anthropic::{AnthropicMessage, AnthropicRequest, AnthropicResponse};
use async_trait::async_trait;
use fablewright_core::CompletionRequest;
use fablewright_error::{
    FablewrightResult, GenerationError, GenerationErrorKind, ProviderError, ProviderErrorKind,
};
use fablewright_interface::TextCompletionService;
use reqwest::Client;
use tracing::{debug, error, instrument, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicClient {
    /// Creates a new Anthropic client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key
    /// * `model` - Model identifier (e.g., "claude-3-5-sonnet-20241022")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        debug!("Creating new Anthropic client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Point the client at a different host, such as a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    /// Sends a request to the Anthropic API.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    pub async fn send(&self, request: &AnthropicRequest) -> FablewrightResult<AnthropicResponse> {
        debug!("Sending request to Anthropic API");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Anthropic API");
                ProviderError::new(ProviderErrorKind::Unreachable(format!("Request failed: {}", e)))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Anthropic API returned error");
            return Err(ProviderError::new(ProviderErrorKind::Api {
                status: status.as_u16(),
                message: body,
            })
            .into());
        }

        let anthropic_response: AnthropicResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Anthropic response");
            ProviderError::new(ProviderErrorKind::InvalidResponse(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        debug!(response_id = %anthropic_response.id(), "Received response from Anthropic");
        Ok(anthropic_response)
    }

    fn convert_request(&self, request: &CompletionRequest) -> FablewrightResult<AnthropicRequest> {
        let build_error = |e: String| GenerationError::new(GenerationErrorKind::RequestBuild(e));

        let message = AnthropicMessage::builder()
            .role("user")
            .content(request.user_prompt().as_str())
            .build()
            .map_err(|e| build_error(e.to_string()))?;

        Ok(AnthropicRequest::builder()
            .model(self.model.as_str())
            .max_tokens(*request.max_tokens())
            .system(Some(request.system_prompt().clone()))
            .messages(vec![message])
            .temperature(Some(*request.temperature()))
            .build()
            .map_err(|e| build_error(e.to_string()))?)
    }
}

#[async_trait]
impl TextCompletionService for AnthropicClient {
    #[instrument(skip(self, request), fields(provider = "anthropic", model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> FablewrightResult<String> {
        let body = self.convert_request(request)?;
        let response = self.send(&body).await?;
        if response.is_truncated() {
            warn!(max_tokens = *request.max_tokens(), "Anthropic response hit the token ceiling");
        }
        Ok(response.text())
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
