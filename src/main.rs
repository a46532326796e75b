use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use std::io;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use wut::explain::{build_prompt, explain};
use wut::output::{format_error, print_debug_section, print_explanation};
use wut::pipeline::{prepare, RunOptions};
use wut::{Cli, WutConfig, WutError};

fn init_tracing(debug: bool) {
    let default = if debug { "warn,wut=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Name we were invoked as, used to find our own prompt line in the pane
fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| arg0.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or("wut")
        .to_string()
}

async fn run(cli: &Cli) -> std::result::Result<(), WutError> {
    let config = WutConfig::load();
    let options = RunOptions {
        query: cli.user_query(),
        timeout: cli.timeout.filter(|secs| *secs > 0).map(Duration::from_secs),
        program: program_name(),
    };

    let prepared = prepare(&config, &options)?;

    if cli.debug {
        let context = &prepared.request.context;
        print_debug_section(
            "Shell",
            &format!("{} ({})", context.shell, context.multiplexer),
            None,
        );
        print_debug_section(
            "Terminal context",
            &context.lines.join("\n"),
            Some(format!("({} lines)", context.lines.len())),
        );
        let prompt = build_prompt(&prepared.request, &options.program);
        print_debug_section("Prompt", &prompt, Some(format!("({} chars)", prompt.len())));
        eprintln!(
            "{}",
            format!(
                "Sending request to {} ({})...",
                prepared.provider.name(),
                prepared.provider.model_name()
            )
            .dimmed()
        );
    }

    let response = explain(prepared.provider.as_ref(), &prepared.request, &options.program).await?;
    print_explanation(&response);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "wut", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    if cli.print_config {
        print!("{}", wut::config::generate_default_config());
        return Ok(ExitCode::SUCCESS);
    }

    match run(&cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("{}", format_error(&err.to_string(), err.tip().as_deref()));
            Ok(ExitCode::FAILURE)
        }
    }
}
