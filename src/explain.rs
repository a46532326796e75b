//! Prompt construction and the single provider round trip.

use crate::context::TerminalContext;
use crate::error::WutError;
use crate::providers::{Provider, ProviderKind};

/// System prompt for terminal explanation
pub const SYSTEM_PROMPT: &str = r#"You are a command-line assistant. The user ran a command in their terminal and wants to understand its output.
You are given the user's shell, some metadata, and the text that was visible in their terminal pane.

Explain what the most recent command's output means. If it is an error, say what went wrong and how to fix it.
If the user asks a specific question, answer that question using the terminal output.
Be concise and practical. Use markdown with short paragraphs, and put commands in code blocks."#;

/// Terminal context plus the user's optional question
#[derive(Debug, Clone)]
pub struct ExplainRequest {
    pub context: TerminalContext,
    pub query: Option<String>,
}

impl ExplainRequest {
    pub fn new(context: TerminalContext, query: Option<String>) -> Self {
        let query = query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        Self { context, query }
    }
}

/// Provider reply, verbatim
#[derive(Debug, Clone)]
pub struct ExplainResponse {
    pub text: String,
    pub provider: ProviderKind,
    pub model: String,
}

/// Build the user prompt for `request`
pub fn build_prompt(request: &ExplainRequest, program: &str) -> String {
    let mut prompt = format!(
        "<terminal>\n{}\n</terminal>",
        request.context.format_for_prompt(program)
    );

    match request.query {
        Some(ref query) => {
            prompt.push_str("\n\nAnswer this question about the terminal output:\n");
            prompt.push_str(query);
        }
        None => prompt.push_str("\n\nExplain the output of my last command."),
    }

    prompt
}

/// Send `request` to `provider` once and return its answer
pub async fn explain(
    provider: &dyn Provider,
    request: &ExplainRequest,
    program: &str,
) -> Result<ExplainResponse, WutError> {
    let prompt = build_prompt(request, program);
    tracing::info!(
        provider = %provider.kind(),
        model = provider.model_name(),
        prompt_chars = prompt.len(),
        "requesting explanation"
    );

    let text = provider
        .complete(SYSTEM_PROMPT, &prompt)
        .await
        .map_err(|err| WutError::ProviderRequestFailed {
            provider: provider.kind(),
            message: format!("{err:#}"),
        })?;

    Ok(ExplainResponse {
        text,
        provider: provider.kind(),
        model: provider.model_name().to_string(),
    })
}
