//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the glip-export configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::{load_config_unvalidated, GlipConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config_unvalidated(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                for line in summary_lines(&config) {
                    println!("{line}");
                }
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(EXIT_CONFIG_ERROR)
            }
        }
    }
}

/// Configuration summary with secrets left out
fn summary_lines(config: &GlipConfig) -> Vec<String> {
    let export = &config.export;
    let max_polls = match export.max_poll_attempts {
        0 => "unlimited".to_string(),
        n => n.to_string(),
    };

    vec![
        "Configuration Summary:".to_string(),
        format!("  Environment: {:?}", config.environment),
        format!("  Log Level: {}", config.application.log_level),
        format!("  Dry Run: {}", config.application.dry_run),
        format!("  Server: {}", config.platform.server_url),
        format!("  Client ID: {}", config.platform.client_id),
        "  Client Secret: ***".to_string(),
        format!("  Username: {}", config.platform.username),
        format!(
            "  Extension: {}",
            config.platform.extension().unwrap_or("(none)")
        ),
        "  Password: ***".to_string(),
        format!("  Window: {} .. {}", export.time_from, export.time_to),
        format!("  Contacts: {:?}", export.contacts),
        format!("  Chat IDs: {:?}", export.chat_ids),
        format!("  Output Directory: {}", export.output_dir),
        format!("  File Prefix: {}", export.file_prefix),
        format!("  Poll Interval: {}s", export.poll_interval_seconds),
        format!("  Max Polls: {max_polls}"),
        format!("  Backoff Multiplier: {}", export.backoff_multiplier),
    ]
}
