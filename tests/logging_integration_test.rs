//! Integration tests for logging functionality
//!
//! The global subscriber can be installed once per process, so only one test
//! in this file calls `init_logging`.

use glip_export::config::LoggingConfig;
use glip_export::core::export::{ExportOutcome, ExportSummary};
use glip_export::domain::TaskId;
use glip_export::logging::init_logging;
use glip_export::logging::structured::LOG_FILE_NAME;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_invalid_level_is_rejected_before_install() {
    let result = init_logging("loud", &LoggingConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_file_logging_creates_directory_and_writes_json() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("info", &config).unwrap();
    let mut summary = ExportSummary::new(ExportOutcome::Completed);
    summary.task_id = Some(TaskId::new("task-1").unwrap());
    summary.log_summary();
    drop(guard);

    assert!(log_path.is_dir());
    let contents = std::fs::read_to_string(log_path.join(LOG_FILE_NAME)).unwrap();
    let first_line = contents.lines().find(|l| l.contains("Export finished")).unwrap();
    let event: serde_json::Value = serde_json::from_str(first_line).unwrap();
    assert_eq!(event["fields"]["task_id"], "task-1");
}
