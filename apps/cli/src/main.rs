//! boxlift entry point.

mod app;
mod auth;
mod cli;
mod config;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Logs go to stderr; stdout carries progress and the link.
    let default_filter = if cli.verbose {
        "debug,hyper_util=info,rustls=info"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: cannot start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let result = rt.block_on(async {
        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, stopping");
                interrupt.cancel();
            }
        });
        app::run_until_cancelled(app::run(cli, cancel.clone()), &cancel).await
    });
    // A pending stdin read would otherwise keep the runtime alive.
    rt.shutdown_timeout(Duration::from_millis(500));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if app::needs_reauthorization(&e) {
                eprintln!("Run `boxlift authorize` to link your Dropbox account again.");
            }
            ExitCode::FAILURE
        }
    }
}
