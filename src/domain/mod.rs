//! Domain models and types for glip-export.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`TaskId`])
//! - **Domain models** ([`ExportTask`], [`Dataset`], [`TimeRange`], [`ArchiveFile`])
//! - **Error types** ([`GlipError`], [`PlatformError`])
//! - **Result type alias** ([`Result`])
//!
//! # Status classification
//!
//! The client only distinguishes three kinds of task status:
//!
//! ```rust
//! use glip_export::domain::TaskStatus;
//!
//! assert!(TaskStatus::from("InProgress").is_running());
//! assert!(TaskStatus::from("Completed").is_completed());
//! assert!(TaskStatus::from("Failed").is_terminal());
//! ```

pub mod archive;
pub mod errors;
pub mod ids;
pub mod result;
pub mod task;

// Re-export commonly used types for convenience
pub use archive::{archive_file_name, is_safe_creation_time, ArchiveFile};
pub use errors::{GlipError, PlatformError};
pub use ids::TaskId;
pub use result::Result;
pub use task::{Dataset, ExportTask, SpecificContent, TaskStatus, TimeRange};
