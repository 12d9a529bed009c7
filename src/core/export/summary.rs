//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::domain::{ArchiveFile, TaskId, TaskStatus};
use std::path::PathBuf;
use std::time::Duration;

/// How an export run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Task completed and every dataset was downloaded
    Completed,
    /// Task completed but archives were only planned, not downloaded
    DryRun,
    /// Task ended in a status other than `Completed`; nothing downloaded
    Stopped,
    /// Poll limit reached while the task was still running
    Exhausted,
    /// Shutdown requested before the run finished
    Interrupted,
}

/// Summary of an export operation
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Export task id, once one is known
    pub task_id: Option<TaskId>,

    /// Task creation time as reported by the platform
    pub creation_time: Option<String>,

    /// Last status observed
    pub final_status: Option<TaskStatus>,

    /// Number of status queries made
    pub poll_attempts: u32,

    /// Archives written to disk
    pub archives: Vec<ArchiveFile>,

    /// Files a dry run would have written
    pub planned_files: Vec<PathBuf>,

    /// How the run ended
    pub outcome: ExportOutcome,

    /// Duration of the export
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new summary with the given outcome
    pub fn new(outcome: ExportOutcome) -> Self {
        Self {
            task_id: None,
            creation_time: None,
            final_status: None,
            poll_attempts: 0,
            archives: Vec::new(),
            planned_files: Vec::new(),
            outcome,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Total bytes written across all archives
    pub fn total_bytes(&self) -> u64 {
        self.archives.iter().map(|a| a.bytes).sum()
    }

    /// Whether the run did everything it set out to do
    pub fn is_successful(&self) -> bool {
        matches!(self.outcome, ExportOutcome::Completed | ExportOutcome::DryRun)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        let task_id = self
            .task_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default();
        let status = self
            .final_status
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_default();

        crate::log_export_complete!(
            task_id,
            status,
            self.poll_attempts,
            self.archives.len(),
            self.total_bytes(),
            self.duration
        );

        if !self.is_successful() {
            tracing::warn!(
                task_id = %task_id,
                outcome = ?self.outcome,
                status = %status,
                "Export finished without downloading archives"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(index: usize, bytes: u64) -> ArchiveFile {
        ArchiveFile {
            index,
            path: PathBuf::from(format!("out_{index}.zip")),
            bytes,
            sha256: String::new(),
        }
    }

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new(ExportOutcome::Completed);

        assert!(summary.task_id.is_none());
        assert_eq!(summary.poll_attempts, 0);
        assert!(summary.archives.is_empty());
        assert_eq!(summary.duration, Duration::from_secs(0));
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary =
            ExportSummary::new(ExportOutcome::Completed).with_duration(Duration::from_secs(120));

        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_total_bytes() {
        let mut summary = ExportSummary::new(ExportOutcome::Completed);
        summary.archives = vec![archive(0, 100), archive(1, 23)];

        assert_eq!(summary.total_bytes(), 123);
    }

    #[test]
    fn test_is_successful() {
        assert!(ExportSummary::new(ExportOutcome::Completed).is_successful());
        assert!(ExportSummary::new(ExportOutcome::DryRun).is_successful());
        assert!(!ExportSummary::new(ExportOutcome::Stopped).is_successful());
        assert!(!ExportSummary::new(ExportOutcome::Exhausted).is_successful());
        assert!(!ExportSummary::new(ExportOutcome::Interrupted).is_successful());
    }
}
