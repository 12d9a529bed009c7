//! Status command implementation
//!
//! This module implements the `status` command: one status query for an
//! existing export task. It never polls and never downloads.

use super::{exit_code_for_error, EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::load_config;
use crate::core::export::ExportCoordinator;
use crate::domain::TaskId;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Export task id
    pub task_id: String,

    /// Print the task as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(task_id = %self.task_id, "Checking export task status");

        let task_id = match TaskId::new(self.task_id.as_str()) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Invalid task id: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let coordinator = match ExportCoordinator::new(config, shutdown_signal).await {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to connect to platform");
                println!("   Error: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        let task = match coordinator.task_status(&task_id).await {
            Ok(t) => t,
            Err(e) => {
                println!("❌ Failed to query export task");
                println!("   Error: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&task)?);
            return Ok(EXIT_SUCCESS);
        }

        println!("📊 Export Task {}", task.id);
        println!("  Status: {}", task.status);
        println!("  Created: {}", task.creation_time);
        if let Some(modified) = &task.last_modified_time {
            println!("  Last Modified: {modified}");
        }
        println!("  Datasets: {}", task.datasets.len());
        for (index, dataset) in task.datasets.iter().enumerate() {
            match dataset.size {
                Some(size) => println!("    [{index}] {} ({size} bytes)", dataset.uri),
                None => println!("    [{index}] {}", dataset.uri),
            }
        }

        Ok(EXIT_SUCCESS)
    }
}
