//! CLI command implementations
//!
//! This module contains all CLI command implementations and the exit code
//! conventions they share.

pub mod download;
pub mod export;
pub mod init;
pub mod status;
pub mod validate;

use crate::core::export::{ExportOutcome, ExportSummary};
use crate::domain::GlipError;

/// Everything requested was done
pub const EXIT_SUCCESS: i32 = 0;
/// Task ended without completing, or polling gave up
pub const EXIT_NOT_COMPLETED: i32 = 1;
/// Configuration or argument error
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Authentication or connection error
pub const EXIT_CONNECTION_ERROR: i32 = 4;
/// Any other failure
pub const EXIT_FATAL: i32 = 5;
/// Interrupted by SIGINT/SIGTERM
pub const EXIT_INTERRUPTED: i32 = 130;

/// Exit code for a failed command
pub fn exit_code_for_error(error: &GlipError) -> i32 {
    match error {
        GlipError::Configuration(_) | GlipError::Validation(_) => EXIT_CONFIG_ERROR,
        e if e.is_connection_error() => EXIT_CONNECTION_ERROR,
        _ => EXIT_FATAL,
    }
}

/// Exit code for a finished export run
pub fn exit_code_for_summary(summary: &ExportSummary) -> i32 {
    match summary.outcome {
        ExportOutcome::Completed | ExportOutcome::DryRun => EXIT_SUCCESS,
        ExportOutcome::Stopped | ExportOutcome::Exhausted => EXIT_NOT_COMPLETED,
        ExportOutcome::Interrupted => EXIT_INTERRUPTED,
    }
}

/// Print a human-readable export summary to stdout
pub(crate) fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    if let Some(task_id) = &summary.task_id {
        println!("  Task ID: {task_id}");
    }
    if let Some(creation_time) = &summary.creation_time {
        println!("  Created: {creation_time}");
    }
    if let Some(status) = &summary.final_status {
        println!("  Status: {status}");
    }
    println!("  Poll Attempts: {}", summary.poll_attempts);
    println!("  Archives: {}", summary.archives.len());
    println!("  Total Bytes: {}", summary.total_bytes());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

    if !summary.archives.is_empty() {
        println!();
        for archive in &summary.archives {
            println!("  📦 {} ({} bytes)", archive.path.display(), archive.bytes);
        }
    }

    if !summary.planned_files.is_empty() {
        println!();
        println!("  Would write:");
        for path in &summary.planned_files {
            println!("    - {}", path.display());
        }
    }
    println!();

    match summary.outcome {
        ExportOutcome::Completed => println!("✅ Export completed successfully!"),
        ExportOutcome::DryRun => println!("✅ Dry run completed, no files written"),
        ExportOutcome::Stopped => {
            println!("⚠️  Export task did not complete, nothing was downloaded")
        }
        ExportOutcome::Exhausted => {
            println!("⚠️  Gave up waiting: export task still running");
            if let Some(task_id) = &summary.task_id {
                println!("   Resume with: glip-export export --task-id {task_id}");
            }
        }
        ExportOutcome::Interrupted => {
            println!("⚠️  Export interrupted");
            if let Some(task_id) = &summary.task_id {
                println!("   Resume with: glip-export export --task-id {task_id}");
            }
        }
    }
}
