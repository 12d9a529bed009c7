//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for glip-export using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// glip-export - Glip compliance data export
#[derive(Parser, Debug)]
#[command(name = "glip-export")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "glip-export.toml", env = "GLIP_EXPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "GLIP_EXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an export task, wait for it and download its archives
    Export(commands::export::ExportArgs),

    /// Show the current status of an export task
    Status(commands::status::StatusArgs),

    /// Download the archives of a completed export task
    Download(commands::download::DownloadArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["glip-export", "export"]);
        assert_eq!(cli.config, "glip-export.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_export_overrides() {
        let cli = Cli::parse_from([
            "glip-export",
            "export",
            "--from",
            "2020-01-01T00:00:00Z",
            "--to",
            "2020-02-01T00:00:00Z",
            "--task-id",
            "abc-123",
            "--dry-run",
        ]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.from.as_deref(), Some("2020-01-01T00:00:00Z"));
                assert_eq!(args.to.as_deref(), Some("2020-02-01T00:00:00Z"));
                assert_eq!(args.task_id.as_deref(), Some("abc-123"));
                assert!(args.dry_run);
            }
            other => panic!("Expected export command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["glip-export", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["glip-export", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_status_requires_task_id() {
        assert!(Cli::try_parse_from(["glip-export", "status"]).is_err());

        let cli = Cli::parse_from(["glip-export", "status", "task-1", "--json"]);
        match cli.command {
            Commands::Status(args) => {
                assert_eq!(args.task_id, "task-1");
                assert!(args.json);
            }
            other => panic!("Expected status command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_download() {
        let cli = Cli::parse_from(["glip-export", "download", "task-1", "-o", "/tmp/out"]);
        match cli.command {
            Commands::Download(args) => {
                assert_eq!(args.task_id, "task-1");
                assert_eq!(args.output_dir.as_deref(), Some("/tmp/out"));
            }
            other => panic!("Expected download command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["glip-export", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["glip-export", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
