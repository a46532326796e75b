//! LLM provider abstraction for terminal explanations.
//!
//! Each supported backend (OpenAI, Anthropic, Ollama) is one variant of
//! [`ProviderCredentials`] and one implementation of [`Provider`]. Adding a
//! backend means adding a variant and its client, not another branch at the
//! call site.

pub mod anthropic;
pub mod ollama;
pub mod openai;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Default OpenAI model when none is configured
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Default Anthropic model when none is configured
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Maximum tokens requested from providers that require a limit
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Supported providers, in auto-detection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProviderKind {
    /// OpenAI (or any OpenAI-compatible) chat completions API
    OpenAI,
    /// Anthropic Messages API
    Anthropic,
    /// Local Ollama server
    Ollama,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::OpenAI,
        ProviderKind::Anthropic,
        ProviderKind::Ollama,
    ];

    /// Config section name for this provider
    pub fn section(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
        }
    }

    /// Human-readable provider name
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Ollama => "Ollama",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    /// Names are matched exactly, so `OpenAI` is not a provider name
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "ollama" => Ok(ProviderKind::Ollama),
            _ => Err(format!(
                "Unknown provider: {}. Valid options: openai, anthropic, ollama",
                s
            )),
        }
    }
}

/// Resolved credentials for one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCredentials {
    OpenAI {
        api_key: Option<String>,
        model: String,
        base_url: Option<String>,
    },
    Anthropic {
        api_key: Option<String>,
        model: String,
        base_url: Option<String>,
    },
    Ollama {
        model: Option<String>,
        base_url: Option<String>,
    },
}

impl ProviderCredentials {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderCredentials::OpenAI { .. } => ProviderKind::OpenAI,
            ProviderCredentials::Anthropic { .. } => ProviderKind::Anthropic,
            ProviderCredentials::Ollama { .. } => ProviderKind::Ollama,
        }
    }

    /// Configured model, if any
    pub fn model(&self) -> Option<&str> {
        match self {
            ProviderCredentials::OpenAI { model, .. }
            | ProviderCredentials::Anthropic { model, .. } => Some(model.as_str()),
            ProviderCredentials::Ollama { model, .. } => model.as_deref(),
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        match self {
            ProviderCredentials::OpenAI { base_url, .. }
            | ProviderCredentials::Anthropic { base_url, .. }
            | ProviderCredentials::Ollama { base_url, .. } => base_url.as_deref(),
        }
    }

    /// First required field that is missing or empty
    pub fn missing_field(&self) -> Option<&'static str> {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        match self {
            ProviderCredentials::OpenAI { api_key, .. }
            | ProviderCredentials::Anthropic { api_key, .. } => {
                (!present(api_key)).then_some("api_key")
            }
            ProviderCredentials::Ollama { model, .. } => (!present(model)).then_some("model"),
        }
    }

    /// Whether every required field is present
    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }
}

/// Client options shared by all providers
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Upper bound on the whole request
    pub timeout: Duration,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Provider trait for terminal explanation
///
/// Given a system prompt and a user prompt, return the model's reply or
/// fail. Implementations perform exactly one request and never retry.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider kind
    fn kind(&self) -> ProviderKind;

    /// Get the provider name for display
    fn name(&self) -> &'static str;

    /// Get the model identifier sent with each request
    fn model_name(&self) -> &str;

    /// Send one prompt and return the response text verbatim
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Error types for provider operations
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{field} not configured for {provider}")]
    MissingCredential {
        provider: &'static str,
        field: &'static str,
    },

    #[error("API error from {provider}: {message}")]
    ApiError { provider: String, message: String },

    #[error("Rate limited by {provider}. Please wait and try again.")]
    RateLimited { provider: String },

    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },
}

/// Build an HTTP client bounded by the configured timeout
pub(crate) fn http_client(options: &ClientOptions) -> Result<reqwest::Client> {
    use anyhow::Context;

    reqwest::Client::builder()
        .timeout(options.timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Turn a non-success HTTP response into a [`ProviderError`]
pub(crate) async fn status_error(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status.as_u16() == 429 {
        return ProviderError::RateLimited {
            provider: provider.to_string(),
        };
    }
    ProviderError::ApiError {
        provider: provider.to_string(),
        message: format!("HTTP {}: {}", status, body.trim()),
    }
}

/// Construct the client for the given credentials
pub fn build_provider(
    credentials: &ProviderCredentials,
    options: &ClientOptions,
) -> Result<Box<dyn Provider>> {
    let kind = credentials.kind();
    if let Some(field) = credentials.missing_field() {
        return Err(ProviderError::MissingCredential {
            provider: kind.display_name(),
            field,
        }
        .into());
    }

    let provider: Box<dyn Provider> = match credentials {
        ProviderCredentials::OpenAI {
            api_key,
            model,
            base_url,
        } => Box::new(openai::OpenAIProvider::new(
            api_key.clone().unwrap_or_default(),
            model.clone(),
            base_url.clone(),
            options,
        )?),
        ProviderCredentials::Anthropic {
            api_key,
            model,
            base_url,
        } => Box::new(anthropic::AnthropicProvider::new(
            api_key.clone().unwrap_or_default(),
            model.clone(),
            base_url.clone(),
            options,
        )?),
        ProviderCredentials::Ollama { model, base_url } => {
            Box::new(ollama::OllamaProvider::new(
                model.clone().unwrap_or_default(),
                base_url.clone(),
                options,
            )?)
        }
    };

    tracing::debug!(provider = %kind, model = provider.model_name(), "built provider client");
    Ok(provider)
}

/// Join a base URL and an API path without doubling slashes
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
