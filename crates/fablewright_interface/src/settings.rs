//! How to reach a completion service.

use serde::{Deserialize, Serialize};

/// The `[provider]` configuration table.
///
/// API keys are never stored here; `api_key_env` names the environment
/// variable that holds the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Provider name: "anthropic" or "openai"
    pub name: String,
    /// Model identifier
    pub model: String,
    /// Override for the provider's API base URL
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: "anthropic".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            base_url: None,
            api_key_env: None,
        }
    }
}
