//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - Local JSON file logging with rotation
//! - Event macros for the export lifecycle
//!
//! # Example
//!
//! ```no_run
//! use glip_export::logging::init_logging;
//! use glip_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log one status query of an export task
///
/// # Example
///
/// ```no_run
/// use glip_export::log_poll_attempt;
/// use glip_export::domain::{TaskId, TaskStatus};
///
/// let task_id = TaskId::new("task-1").unwrap();
/// log_poll_attempt!(task_id, 3, TaskStatus::InProgress);
/// ```
#[macro_export]
macro_rules! log_poll_attempt {
    ($task_id:expr, $attempt:expr, $status:expr) => {
        tracing::info!(
            task_id = %$task_id,
            attempt = $attempt,
            status = %$status,
            "Polled export task"
        );
    };
}

/// Log an archive written to disk
///
/// # Example
///
/// ```no_run
/// use glip_export::log_archive_saved;
/// use glip_export::domain::ArchiveFile;
///
/// let archive = ArchiveFile {
///     index: 0,
///     path: "rc-export-reports_2019-08-01T10:00:00.000Z_0.zip".into(),
///     bytes: 1024,
///     sha256: String::new(),
/// };
/// log_archive_saved!(archive);
/// ```
#[macro_export]
macro_rules! log_archive_saved {
    ($archive:expr) => {
        tracing::info!(
            index = $archive.index,
            path = %$archive.path.display(),
            bytes = $archive.bytes,
            sha256 = %$archive.sha256,
            "Archive saved"
        );
    };
}

/// Log the completion of an export operation
///
/// # Example
///
/// ```no_run
/// use glip_export::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!("task-1", "Completed", 4, 2, 2048u64, Duration::from_secs(20));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($task_id:expr, $status:expr, $attempts:expr, $archives:expr, $bytes:expr, $duration:expr) => {
        tracing::info!(
            task_id = %$task_id,
            status = %$status,
            poll_attempts = $attempts,
            archives = $archives,
            total_bytes = $bytes,
            duration_ms = $duration.as_millis() as u64,
            "Export finished"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use glip_export::log_error_with_context;
/// use glip_export::domain::GlipError;
///
/// let error = GlipError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
