//! Interpreter backend configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Interpreter backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the upstream model provider
    pub api_key: Option<String>,

    /// Model identifier sent to the backend
    #[serde(default = "default_model")]
    pub model: String,

    /// System prompt prepended to every request, if set
    pub system_prompt: Option<String>,

    /// Base URL of the chat-completions API. Point this at any
    /// OpenAI-compatible server (LM Studio, a local proxy, ...).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Offline mode: the gateway talks to a local OpenAI-compatible
    /// endpoint and no real API key is required.
    #[serde(default)]
    pub offline: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate interpreter configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        // Offline mode targets a local endpoint that ignores credentials
        if !self.offline && !self.has_api_key() {
            return Err(ValidationError::MissingRequired(
                "CHAT_GATEWAY__AI__API_KEY",
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }

        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            system_prompt: None,
            base_url: default_base_url(),
            offline: false,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    120
}
