//! OpenAI API provider.
//!
//! Uses the Chat Completions API. A custom `base_url` points the client at
//! any OpenAI-compatible server.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{http_client, join_url, status_error, ClientOptions, Provider, ProviderError, ProviderKind};

/// Default OpenAI API base
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI provider
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new(
        api_key: String,
        model: String,
        base_url: Option<String>,
        options: &ClientOptions,
    ) -> Result<Self> {
        let base = base_url.as_deref().unwrap_or(OPENAI_BASE_URL);
        Ok(Self {
            client: http_client(options)?,
            api_key,
            model,
            endpoint: join_url(base, "chat/completions"),
            max_tokens: options.max_tokens,
        })
    }

    fn build_request(&self, system: &str, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            max_tokens: Some(self.max_tokens),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        }
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAI
    }

    fn name(&self) -> &'static str {
        "OpenAI"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let request = self.build_request(system, prompt);

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "sending OpenAI request");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        if !response.status().is_success() {
            bail!(status_error("OpenAI", response).await);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        let content = body
            .choices
            .into_iter()
            .filter_map(|choice| choice.message.and_then(|m| m.content))
            .collect::<Vec<_>>()
            .join("");

        if content.is_empty() {
            bail!(ProviderError::InvalidResponse {
                provider: "OpenAI".to_string(),
                message: "response contained no message content".to_string(),
            });
        }

        Ok(content)
    }
}

// API types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base_url: Option<&str>) -> OpenAIProvider {
        OpenAIProvider::new(
            "test-key".to_string(),
            "gpt-4o".to_string(),
            base_url.map(str::to_string),
            &ClientOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_openai_provider_creation() {
        let provider = provider(None);
        assert_eq!(provider.kind(), ProviderKind::OpenAI);
        assert_eq!(provider.name(), "OpenAI");
        assert_eq!(provider.model_name(), "gpt-4o");
        assert_eq!(
            provider.endpoint,
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let provider = provider(Some("http://localhost:8080/v1/"));
        assert_eq!(provider.endpoint, "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_build_request_has_system_and_user_messages() {
        let request = provider(None).build_request("be brief", "what happened?");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be brief");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "what happened?");
        assert_eq!(json["max_tokens"], 1024);
    }
}
