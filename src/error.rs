//! Pipeline error taxonomy.
//!
//! Every variant is terminal for the invocation: nothing is retried and no
//! partial result is kept.

use crate::config::ProviderSelection;
use crate::context::CaptureError;
use crate::providers::ProviderKind;

#[derive(Debug, thiserror::Error)]
pub enum WutError {
    /// No usable provider; raised before any network activity
    #[error("{}", configuration_message(.selection))]
    ConfigurationInvalid { selection: ProviderSelection },

    /// Not running inside tmux or screen
    #[error("wut must be run inside a tmux or screen session.")]
    PreconditionFailed,

    #[error("Failed to capture terminal contents: {0}")]
    ContextCaptureFailed(#[from] CaptureError),

    /// Network, auth or response failure from the active provider
    #[error("Request to {provider} failed: {message}")]
    ProviderRequestFailed {
        provider: ProviderKind,
        message: String,
    },
}

impl WutError {
    /// Remediation hint shown under the error
    pub fn tip(&self) -> Option<String> {
        match self {
            WutError::ConfigurationInvalid { selection } => Some(match selection {
                ProviderSelection::ExplicitMissingCredentials { kind, field } => format!(
                    "Set `{field}` under [{kind}] in ~/.config/wut/config or export {}_{}",
                    kind.section().to_uppercase(),
                    field.to_uppercase()
                ),
                _ => "Either:\n  1. Create ~/.config/wut/config with your API keys and models (see `wut --print-config`), or\n  2. Set environment variables (OPENAI_API_KEY, ANTHROPIC_API_KEY, or OLLAMA_MODEL)".to_string(),
            }),
            WutError::PreconditionFailed => {
                Some("Start tmux or screen, rerun the failing command, then run wut.".to_string())
            }
            WutError::ContextCaptureFailed(_) => None,
            WutError::ProviderRequestFailed { .. } => {
                Some("Check your API key, model name and network connection.".to_string())
            }
        }
    }
}

fn configuration_message(selection: &ProviderSelection) -> String {
    match selection {
        ProviderSelection::ExplicitMissingCredentials { kind, field } => format!(
            "Provider `{kind}` is selected in [general] but its {field} is not configured."
        ),
        _ => "No valid LLM provider configuration found.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_messages() {
        let err = WutError::ConfigurationInvalid {
            selection: ProviderSelection::None,
        };
        assert_eq!(err.to_string(), "No valid LLM provider configuration found.");
        assert!(err.tip().unwrap().contains("OPENAI_API_KEY"));

        let err = WutError::ConfigurationInvalid {
            selection: ProviderSelection::ExplicitMissingCredentials {
                kind: ProviderKind::Anthropic,
                field: "api_key",
            },
        };
        assert!(err.to_string().contains("anthropic"));
        assert!(err.tip().unwrap().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_provider_failure_names_provider() {
        let err = WutError::ProviderRequestFailed {
            provider: ProviderKind::Ollama,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request to ollama failed: connection refused"
        );
    }
}
