//! Local Ollama provider.
//!
//! Talks to an Ollama server's `/api/generate` endpoint with streaming
//! disabled, so the whole reply arrives in one JSON object.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{http_client, join_url, status_error, ClientOptions, Provider, ProviderError, ProviderKind};

/// Default Ollama server address
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Port assumed when an `OLLAMA_HOST`-style address names only a host
const OLLAMA_DEFAULT_PORT: u16 = 11434;

pub struct OllamaProvider {
    client: Client,
    model: String,
    endpoint: String,
}

impl OllamaProvider {
    pub fn new(model: String, base_url: Option<String>, options: &ClientOptions) -> Result<Self> {
        let base = base_url
            .as_deref()
            .map(normalize_base_url)
            .unwrap_or_else(|| OLLAMA_BASE_URL.to_string());
        Ok(Self {
            client: http_client(options)?,
            model,
            endpoint: join_url(&base, "api/generate"),
        })
    }

    fn build_request(&self, system: &str, prompt: &str) -> GenerateRequest {
        GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            system: (!system.is_empty()).then(|| system.to_string()),
            stream: false,
        }
    }
}

/// Turn an address in Ollama's own `OLLAMA_HOST` format into a base URL.
///
/// A bare `host`, `host:port`, `:port` or IPv6 address gets `http://`, and
/// port 11434 when it names none. Addresses with a scheme are used as given.
fn normalize_base_url(raw: &str) -> String {
    let raw = raw.trim().trim_end_matches('/');
    if raw.contains("://") {
        return raw.to_string();
    }

    let (authority, path) = match raw.find('/') {
        Some(idx) => raw.split_at(idx),
        None => (raw, ""),
    };
    let authority = if authority.starts_with('[') {
        if authority.contains("]:") {
            authority.to_string()
        } else {
            format!("{authority}:{OLLAMA_DEFAULT_PORT}")
        }
    } else if authority.matches(':').count() > 1 {
        format!("[{authority}]:{OLLAMA_DEFAULT_PORT}")
    } else {
        match authority.split_once(':') {
            Some(("", port)) => format!("127.0.0.1:{port}"),
            Some(_) => authority.to_string(),
            None if authority.is_empty() => format!("127.0.0.1:{OLLAMA_DEFAULT_PORT}"),
            None => format!("{authority}:{OLLAMA_DEFAULT_PORT}"),
        }
    };
    format!("http://{authority}{path}")
}

#[async_trait]
impl Provider for OllamaProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn name(&self) -> &'static str {
        "Ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let request = self.build_request(system, prompt);

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "sending Ollama request");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to reach Ollama at {}", self.endpoint))?;

        if !response.status().is_success() {
            bail!(status_error("Ollama", response).await);
        }

        let body: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        if let Some(error) = body.error {
            bail!(ProviderError::ApiError {
                provider: "Ollama".to_string(),
                message: error,
            });
        }

        Ok(body.response)
    }
}

// API types

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider =
            OllamaProvider::new("llama3".to_string(), None, &ClientOptions::default()).unwrap();
        assert_eq!(provider.kind(), ProviderKind::Ollama);
        assert_eq!(provider.model_name(), "llama3");
        assert_eq!(provider.endpoint, "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("127.0.0.1:11434"), "http://127.0.0.1:11434");
        assert_eq!(normalize_base_url("gpu-box"), "http://gpu-box:11434");
        assert_eq!(normalize_base_url(":8080"), "http://127.0.0.1:8080");
        assert_eq!(normalize_base_url("::1"), "http://[::1]:11434");
        assert_eq!(normalize_base_url("[::1]:9000"), "http://[::1]:9000");
        assert_eq!(
            normalize_base_url("ollama.lan:11434/proxy/"),
            "http://ollama.lan:11434/proxy"
        );
        assert_eq!(normalize_base_url("http://gpu:11434/"), "http://gpu:11434");
        assert_eq!(
            normalize_base_url("https://ollama.example.com"),
            "https://ollama.example.com"
        );
    }

    #[test]
    fn test_schemeless_host_builds_absolute_endpoint() {
        let provider = OllamaProvider::new(
            "llama3".to_string(),
            Some("127.0.0.1:41249".to_string()),
            &ClientOptions::default(),
        )
        .unwrap();
        assert_eq!(provider.endpoint, "http://127.0.0.1:41249/api/generate");
    }

    #[test]
    fn test_build_request_disables_streaming() {
        let provider = OllamaProvider::new(
            "llama3".to_string(),
            Some("http://gpu-box:11434/".to_string()),
            &ClientOptions::default(),
        )
        .unwrap();
        assert_eq!(provider.endpoint, "http://gpu-box:11434/api/generate");

        let json = serde_json::to_value(provider.build_request("sys", "prompt")).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["model"], "llama3");
        assert_eq!(json["system"], "sys");
    }
}
