//! Download command implementation
//!
//! This module implements the `download` command: fetch the archives of an
//! export task that has already completed, without polling.

use super::{exit_code_for_error, exit_code_for_summary, print_summary, EXIT_CONFIG_ERROR};
use crate::config::load_config_unvalidated;
use crate::core::export::ExportCoordinator;
use crate::domain::TaskId;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Export task id
    pub task_id: String,

    /// Override the directory archives are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<String>,
}

impl DownloadArgs {
    /// Execute the download command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let task_id = match TaskId::new(self.task_id.as_str()) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Invalid task id: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let mut config = match load_config_unvalidated(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        if let Some(output_dir) = &self.output_dir {
            config.export.output_dir = output_dir.clone();
        }
        if let Err(e) = config.validate() {
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        tracing::info!(task_id = %task_id, output_dir = %config.export.output_dir, "Downloading export archives");

        let coordinator = match ExportCoordinator::new(config, shutdown_signal).await {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to connect to platform: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        match coordinator.download_completed(&task_id).await {
            Ok(summary) => {
                print_summary(&summary);
                Ok(exit_code_for_summary(&summary))
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Download failed");
                eprintln!("Download failed: {e}");
                Ok(exit_code_for_error(&e))
            }
        }
    }
}
