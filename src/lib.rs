//! wut - explain the output of your last terminal command
//!
//! This library provides the core functionality for the `wut` CLI tool:
//! layered provider configuration, tmux/screen pane capture, and the
//! single LLM request that explains what is on screen.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod explain;
pub mod ini;
pub mod output;
pub mod pipeline;
pub mod providers;

// Re-export commonly used types
pub use cli::Cli;
pub use config::{ConfigSource, EnvSnapshot, ProviderSelection, ResolvedConfig, WutConfig};
pub use context::{Multiplexer, ShellKind, TerminalContext};
pub use error::WutError;
pub use explain::{ExplainRequest, ExplainResponse};
pub use pipeline::RunOptions;
pub use providers::{Provider, ProviderCredentials, ProviderKind};
