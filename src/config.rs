//! Configuration management for bashchat.
//!
//! Configuration can be set via environment variables:
//! - `OPENROUTER_API_KEY` - Required. Your OpenRouter API key.
//! - `BASE_URL` - Optional. OpenAI-compatible API base URL. Defaults to
//!   `https://openrouter.ai/api/v1`.
//! - `DEFAULT_MODEL` - Optional. The LLM model to use. Defaults to
//!   `deepseek/deepseek-v3.2-exp`.
//! - `SYSTEM_PROMPT` - Optional. The system message opening every
//!   conversation.

use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "deepseek/deepseek-v3.2-exp";
const DEFAULT_SYSTEM_PROMPT: &str = "You are a concise assistant that answers in one line.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Chat client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenRouter API key
    pub api_key: String,

    /// Base URL of the OpenAI-compatible API
    pub base_url: String,

    /// LLM model identifier (OpenRouter format)
    pub model: String,

    /// System message that opens every conversation
    pub system_prompt: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENROUTER_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?;

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ConfigError::InvalidValue(
                "BASE_URL".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let model = std::env::var("DEFAULT_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let system_prompt = std::env::var("SYSTEM_PROMPT")
            .unwrap_or_else(|_| DEFAULT_SYSTEM_PROMPT.to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
            system_prompt,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}
