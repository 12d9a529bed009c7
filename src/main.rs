// glip-export - Glip compliance data export tool
// Copyright (c) 2025 glip-export Contributors
// Licensed under the MIT License

use clap::Parser;
use glip_export::cli::commands::{EXIT_CONFIG_ERROR, EXIT_FATAL};
use glip_export::cli::{Cli, Commands};
use glip_export::config::{load_config_unvalidated, ApplicationConfig, LoggingConfig};
use glip_export::logging::init_logging;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (application, logging_config) = logging_settings(&cli);
    let log_level = cli.log_level.as_deref().unwrap_or(&application.log_level);
    let guard = match init_logging(log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_CONFIG_ERROR);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "glip-export - Glip compliance data export"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create SIGTERM handler");
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => request_shutdown("SIGINT (Ctrl+C)", &shutdown_tx),
                _ = sigterm.recv() => request_shutdown("SIGTERM", &shutdown_tx),
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                request_shutdown("SIGINT (Ctrl+C)", &shutdown_tx);
            }
        }
    });

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors; flush the file writer first
    drop(guard);
    process::exit(exit_code);
}

/// Tell running commands to stop
///
/// The notice goes to stderr; stdout carries command output only.
fn request_shutdown(signal: &str, shutdown_tx: &watch::Sender<bool>) {
    tracing::info!(signal, "Received shutdown signal, initiating graceful shutdown...");
    eprintln!("\n⚠️  Shutdown signal received, stopping after the current request...");
    let _ = shutdown_tx.send(true);
}

/// Log level and file logging settings from the config file, if it loads
///
/// Falls back to console-only logging at `info` when the file is missing or
/// invalid; the command itself reports the configuration error.
fn logging_settings(cli: &Cli) -> (ApplicationConfig, LoggingConfig) {
    if matches!(cli.command, Commands::Init(_)) {
        return Default::default();
    }
    load_config_unvalidated(&cli.config)
        .map(|config| (config.application, config.logging))
        .unwrap_or_default()
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Export(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::Status(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::Download(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shutdown_notifies_receivers() {
        let (tx, rx) = watch::channel(false);
        request_shutdown("SIGTERM", &tx);
        assert!(*rx.borrow());
    }

    #[test]
    fn test_request_shutdown_without_receivers() {
        let (tx, rx) = watch::channel(false);
        drop(rx);
        request_shutdown("SIGINT (Ctrl+C)", &tx);
    }
}
