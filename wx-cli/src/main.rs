//! Binary crate for the `wx` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and dispatching commands
//! - Human-friendly output formatting
//! - Mapping errors to a message and exit status 1

use colored::Colorize;
use std::{io, process::ExitCode};
use tracing_subscriber::{EnvFilter, fmt};
use wx_core::WeatherError;

mod cli;
mod output;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cmd = match cli::Cli::from_args(std::env::args_os()) {
        Ok(cmd) => cmd,
        Err(err) => return report(&err),
    };

    init_tracing(cmd.verbose);
    tracing::debug!(?cmd, "Parsed CLI arguments");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cmd.run(&mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn report(err: &WeatherError) -> ExitCode {
    tracing::debug!(error = ?err, "command failed");
    eprintln!("{} {err}", "error:".red().bold());
    if let Some(hint) = err.hint() {
        eprintln!("{}", hint.dimmed());
    }
    ExitCode::FAILURE
}

/// Initialize global tracing subscriber on stderr.
///
/// - Uses `RUST_LOG` if set (e.g. `RUST_LOG=wx_core=debug`)
/// - Otherwise `warn` for our crates, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wx_cli={level},wx_core={level}")));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
