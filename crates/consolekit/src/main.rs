//! Sample console application wired through the consolekit host.

use anyhow::{Context, Result};
use clap::Parser;
use consolekit::config::ConfigLoadOptions;
use consolekit::host::{init_console, run_console};
use consolekit::sample::{TestClient, register_services};
use std::path::PathBuf;
use std::process::ExitCode;

const APP_NAME: &str = "ConsoleKit.Sample";

/// Command-line options for the sample application.
#[derive(Parser)]
#[command(name = "consolekit-sample", version)]
struct Cli {
    /// Directory holding the appsettings*.json files (defaults to the cwd)
    #[arg(long)]
    content_root: Option<PathBuf>,
    /// Exit without waiting for a keypress
    #[arg(long)]
    no_wait: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let content_root = match cli.content_root {
        Some(path) => path,
        None => {
            std::env::current_dir().context("failed to resolve current working directory")?
        }
    };

    let config = init_console(APP_NAME, ConfigLoadOptions::new(content_root))?;
    let allow_wait = !cli.no_wait;
    let code = run_console(config, register_services, move |resolver| {
        TestClient::from_resolver(resolver, allow_wait)
    })
    .await?;

    Ok(exit_code(code))
}

/// Exit codes outside `0..=255` are reported as a generic failure.
fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code)
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE)
}
