//! Local archive files
//!
//! Each dataset of a completed export is written to exactly one local file.

use serde::Serialize;
use std::path::PathBuf;

/// Default file name prefix for downloaded archives
pub const DEFAULT_FILE_PREFIX: &str = "rc-export-reports";

/// Build the local file name for one dataset
///
/// The creation time is embedded verbatim, as reported by the platform.
///
/// # Examples
///
/// ```
/// use glip_export::domain::archive::archive_file_name;
///
/// let name = archive_file_name("rc-export-reports", "2019-08-01T10:00:00.000Z", 0);
/// assert_eq!(name, "rc-export-reports_2019-08-01T10:00:00.000Z_0.zip");
/// ```
pub fn archive_file_name(prefix: &str, creation_time: &str, index: usize) -> String {
    format!("{prefix}_{creation_time}_{index}.zip")
}

/// Whether a creation time can be embedded in a file name
///
/// Rejects empty values, path separators and `..`.
pub fn is_safe_creation_time(creation_time: &str) -> bool {
    !creation_time.trim().is_empty()
        && !creation_time.contains(['/', '\\'])
        && !creation_time.contains("..")
}

/// An archive written to local disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveFile {
    /// Position of the dataset in the task's dataset list
    pub index: usize,

    /// Where the archive was written
    pub path: PathBuf,

    /// Number of bytes written
    pub bytes: u64,

    /// Hex-encoded SHA-256 of the written content
    pub sha256: String,
}
