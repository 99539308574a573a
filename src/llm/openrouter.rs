//! Reqwest-backed client for OpenAI-compatible chat-completion APIs.

use async_trait::async_trait;

use super::{ChatMessage, ChatRequest, ChatResponse, LlmClient, LlmError, ToolDefinition};

/// Client for an OpenAI-compatible endpoint (OpenRouter by default).
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenRouterClient {
    /// Create a client against the given base URL (without the
    /// `/chat/completions` suffix).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatMessage, LlmError> {
        let request = ChatRequest {
            model,
            messages,
            tools,
        };

        tracing::debug!(model, message_count = messages.len(), "sending chat completion");

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let body: ChatResponse = response.json().await?;
        body.into_message()
    }
}
