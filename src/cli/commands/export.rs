//! Export command implementation
//!
//! This module implements the `export` command: submit an export task (or
//! resume an existing one), poll it to completion and download its archives.

use super::{exit_code_for_error, exit_code_for_summary, print_summary, EXIT_CONFIG_ERROR};
use crate::config::{load_config_unvalidated, GlipConfig};
use crate::core::export::ExportCoordinator;
use crate::domain::TaskId;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override the start of the export window (ISO 8601)
    #[arg(long, value_name = "TIMESTAMP")]
    pub from: Option<String>,

    /// Override the end of the export window (ISO 8601)
    #[arg(long, value_name = "TIMESTAMP")]
    pub to: Option<String>,

    /// Override the directory archives are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Resume polling an existing export task instead of creating one
    #[arg(long, value_name = "TASK_ID")]
    pub task_id: Option<String>,

    /// Dry run mode - poll the task but write no archives
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut GlipConfig) {
        if let Some(from) = &self.from {
            tracing::info!(time_from = %from, "Overriding export start from CLI");
            config.export.time_from = from.clone();
        }

        if let Some(to) = &self.to {
            tracing::info!(time_to = %to, "Overriding export end from CLI");
            config.export.time_to = to.clone();
        }

        if let Some(output_dir) = &self.output_dir {
            tracing::info!(output_dir = %output_dir, "Overriding output directory from CLI");
            config.export.output_dir = output_dir.clone();
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
    }

    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config_unvalidated(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let task_id = match self.task_id.as_deref().map(TaskId::new).transpose() {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Invalid task id: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no archives will be written");
            println!("🔍 DRY RUN MODE - No archives will be written");
            println!();
        }

        println!("Export Configuration:");
        println!("  Server: {}", config.platform.server_url);
        match &task_id {
            Some(id) => println!("  Resuming Task: {id}"),
            None => println!(
                "  Window: {} .. {}",
                config.export.time_from, config.export.time_to
            ),
        }
        println!("  Output Directory: {}", config.export.output_dir);
        println!();

        let coordinator = match ExportCoordinator::new(config, shutdown_signal).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to platform");
                eprintln!("Failed to initialize export: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        println!("🚀 Starting export...");

        let result = match &task_id {
            Some(id) => coordinator.resume_export(id).await,
            None => coordinator.execute_export().await,
        };

        let summary = match result {
            Ok(s) => s,
            Err(e) => {
                crate::log_error_with_context!(&e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        print_summary(&summary);
        Ok(exit_code_for_summary(&summary))
    }
}
