//! The capture-and-dispatch pipeline.
//!
//! Order: multiplexer precondition, provider resolution, shell detection,
//! pane capture, then exactly one provider request. Every check that can
//! fail happens before the network call.

use std::time::Duration;

use crate::config::WutConfig;
use crate::context::{get_shell, get_terminal_context, Multiplexer, ShellKind};
use crate::error::WutError;
use crate::explain::ExplainRequest;
use crate::providers::{build_provider, ClientOptions, Provider};

/// Per-invocation inputs that do not come from the config file
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// The user's question, if any
    pub query: Option<String>,
    /// Overrides `[general] timeout`
    pub timeout: Option<Duration>,
    /// Name the tool was invoked as, used to find the prompt in the pane
    pub program: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            query: None,
            timeout: None,
            program: "wut".to_string(),
        }
    }
}

/// Everything needed for the provider call
pub struct Prepared {
    pub provider: Box<dyn Provider>,
    pub request: ExplainRequest,
}

/// Run every local step of the pipeline; performs no network I/O.
/// The caller sends `Prepared::request` with [`crate::explain::explain`].
pub fn prepare(config: &WutConfig, options: &RunOptions) -> Result<Prepared, WutError> {
    let env = config.env();
    let multiplexer = Multiplexer::detect(env).ok_or(WutError::PreconditionFailed)?;

    let resolved = config.resolve();
    let credentials = resolved
        .active_credentials()
        .ok_or_else(|| WutError::ConfigurationInvalid {
            selection: resolved.selection.clone(),
        })?;
    tracing::debug!(selection = ?resolved.selection, "resolved provider");

    let shell = get_shell(env).unwrap_or_else(|err| {
        tracing::warn!(%err, "continuing with unknown shell");
        ShellKind::Unknown
    });
    let context = get_terminal_context(shell, multiplexer, resolved.general.history_lines, env)?;

    let client_options = ClientOptions {
        timeout: options
            .timeout
            .unwrap_or(Duration::from_secs(resolved.general.timeout_secs)),
        ..ClientOptions::default()
    };
    let provider = build_provider(credentials, &client_options).map_err(|err| {
        WutError::ProviderRequestFailed {
            provider: credentials.kind(),
            message: format!("{err:#}"),
        }
    })?;

    Ok(Prepared {
        provider,
        request: ExplainRequest::new(context, options.query.clone()),
    })
}
