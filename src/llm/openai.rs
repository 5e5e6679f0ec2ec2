use super::{CompletionError, CompletionProvider, PromptMessage};
use crate::config::ModelConfig;
use async_trait::async_trait;
use serde_json::json;

/// OpenAI chat-completions provider
pub struct OpenAiProvider {
    config: ModelConfig,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, prompt: &[PromptMessage]) -> super::Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let mut api_messages = Vec::new();
        for msg in prompt {
            api_messages.push(json!({
                "role": msg.role.to_string(),
                "content": msg.content
            }));
        }

        let payload = json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": api_messages,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| CompletionError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => CompletionError::AuthenticationFailed(text),
                429 => CompletionError::RateLimitExceeded,
                _ => CompletionError::InvalidRequest(text),
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CompletionError::ParseError(e.to_string()))?;

        let content = data
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| CompletionError::ParseError("No completion content".to_string()))?;

        Ok(content.to_string())
    }
}
