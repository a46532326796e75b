//! Command-line interface definitions for the `wut` tool.

use clap::Parser;
use clap_complete::Shell;

/// Understand the output of your latest terminal command
#[derive(Parser, Debug)]
#[command(
    name = "wut",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("WUT_GIT_SHA"), ")"),
    about,
    long_about = None
)]
#[command(
    after_help = "EXAMPLES:\n    wut\n    wut how do I fix this\n    wut --query \"why is the port already in use?\"\n\nwut must be run inside a tmux or screen session."
)]
pub struct Cli {
    /// A specific question about what's on your terminal
    #[arg(trailing_var_arg = true, conflicts_with = "query")]
    pub question: Vec<String>,

    /// A specific question about what's on your terminal
    #[arg(long, short = 'q', value_name = "TEXT")]
    pub query: Option<String>,

    /// Print debug information (shell, captured context, prompt)
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Seconds to wait for the provider (overrides the config file)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print a config file template and exit
    #[arg(long)]
    pub print_config: bool,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// The user's question from `--query` or the positional words
    pub fn user_query(&self) -> Option<String> {
        if let Some(ref query) = self.query {
            return Some(query.clone());
        }
        if self.question.is_empty() {
            None
        } else {
            Some(self.question.join(" "))
        }
    }
}
