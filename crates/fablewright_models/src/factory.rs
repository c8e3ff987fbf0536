//! Choosing a completion client from configuration.

use crate::{AnthropicClient, OpenAICompatibleClient};
use fablewright_error::{
    ConfigError, ConfigErrorKind, FablewrightResult, ProviderError, ProviderErrorKind,
};
use fablewright_interface::{ProviderSettings, TextCompletionService};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};

/// Supported provider families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ProviderKind {
    /// Anthropic Messages API
    Anthropic,
    /// OpenAI or any compatible endpoint
    #[strum(serialize = "openai", serialize = "openai-compatible")]
    OpenAi,
}

impl ProviderKind {
    /// Environment variable read when `api_key_env` is not set.
    pub fn default_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
        }
    }
}

fn provider_kind(settings: &ProviderSettings) -> FablewrightResult<ProviderKind> {
    ProviderKind::from_str(settings.name.trim()).map_err(|_| {
        ConfigError::new(ConfigErrorKind::InvalidValue {
            key: "provider.name".to_string(),
            reason: format!(
                "unknown provider '{}' (expected anthropic or openai)",
                settings.name
            ),
        })
        .into()
    })
}

/// Build the configured client, reading its API key from the environment.
///
/// # Errors
///
/// - Configuration error for an unknown provider name
/// - [`ProviderErrorKind::MissingApiKey`] when the key variable is unset
#[instrument(skip_all, fields(provider = %settings.name, model = %settings.model))]
pub fn build_service(settings: &ProviderSettings) -> FablewrightResult<Arc<dyn TextCompletionService>> {
    let kind = provider_kind(settings)?;
    let key_env = settings
        .api_key_env
        .clone()
        .unwrap_or_else(|| kind.default_key_env().to_string());

    let api_key = std::env::var(&key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ProviderError::new(ProviderErrorKind::MissingApiKey(key_env.clone())))?;

    build_service_with_key(settings, api_key)
}

/// Build the configured client with an explicit API key.
///
/// # Errors
///
/// Returns a configuration error for an unknown provider name.
#[instrument(skip_all, fields(provider = %settings.name, model = %settings.model))]
pub fn build_service_with_key(
    settings: &ProviderSettings,
    api_key: impl Into<String>,
) -> FablewrightResult<Arc<dyn TextCompletionService>> {
    let kind = provider_kind(settings)?;
    let service: Arc<dyn TextCompletionService> = match kind {
        ProviderKind::Anthropic => {
            let client = AnthropicClient::new(api_key, settings.model.as_str());
            match &settings.base_url {
                Some(url) => Arc::new(client.with_base_url(url.as_str())),
                None => Arc::new(client),
            }
        }
        ProviderKind::OpenAi => Arc::new(OpenAICompatibleClient::new(
            api_key,
            settings.model.as_str(),
            settings
                .base_url
                .as_deref()
                .unwrap_or(OpenAICompatibleClient::OPENAI_BASE_URL),
            "openai",
        )),
    };

    info!(kind = %kind, "Completion service ready");
    Ok(service)
}
