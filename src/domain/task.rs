//! Export task domain model
//!
//! An export task is a server-side job that produces one or more downloadable
//! archives (datasets). The client only ever reads tasks; the platform owns
//! every state transition.

use super::ids::TaskId;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an export task as reported by the platform
///
/// Anything the client does not recognise is kept verbatim in
/// [`TaskStatus::Other`] so it can be logged exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// Request accepted, not started yet
    Accepted,
    /// Export is being generated
    InProgress,
    /// Datasets are ready for download
    Completed,
    /// Export failed on the server
    Failed,
    /// Datasets are no longer available
    Expired,
    /// Any status this client does not know about
    Other(String),
}

impl TaskStatus {
    /// Still running: keep polling
    pub fn is_running(&self) -> bool {
        matches!(self, TaskStatus::Accepted | TaskStatus::InProgress)
    }

    /// Datasets can be fetched
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// No further polling is needed
    pub fn is_terminal(&self) -> bool {
        !self.is_running()
    }

    /// Wire representation of the status
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Accepted => "Accepted",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Failed => "Failed",
            TaskStatus::Expired => "Expired",
            TaskStatus::Other(s) => s,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Accepted" => TaskStatus::Accepted,
            "InProgress" => TaskStatus::InProgress,
            "Completed" => TaskStatus::Completed,
            "Failed" => TaskStatus::Failed,
            "Expired" => TaskStatus::Expired,
            _ => TaskStatus::Other(s),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        TaskStatus::from(s.to_string())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One downloadable archive segment of a completed export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Content location, absolute or relative to the platform server
    pub uri: String,

    /// Dataset identifier (optional)
    pub id: Option<String>,

    /// Archive size in bytes as reported by the platform (optional)
    pub size: Option<u64>,

    /// When the download link stops working (optional)
    pub expires_at: Option<String>,
}

impl Dataset {
    /// Create a dataset descriptor with only a content URI
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            id: None,
            size: None,
            expires_at: None,
        }
    }
}

/// Snapshot of an export task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTask {
    /// Task identifier
    pub id: TaskId,

    /// Current status
    pub status: TaskStatus,

    /// Creation timestamp exactly as the platform reported it
    ///
    /// Kept as a string because it is embedded verbatim in archive names.
    pub creation_time: String,

    /// Last modification timestamp (optional)
    pub last_modified_time: Option<String>,

    /// Canonical resource URI of the task (optional)
    pub uri: Option<String>,

    /// Content selection echoed back by the platform (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_content: Option<SpecificContent>,

    /// Datasets produced by the task; empty until the task completes
    pub datasets: Vec<Dataset>,
}

/// Time window and filters the platform reports for a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificContent {
    pub time_from: Option<String>,
    pub time_to: Option<String>,

    /// Contact ids or emails
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chat_ids: Vec<String>,
}

impl ExportTask {
    /// Create a task snapshot without datasets
    pub fn new(id: TaskId, status: TaskStatus, creation_time: impl Into<String>) -> Self {
        Self {
            id,
            status,
            creation_time: creation_time.into(),
            last_modified_time: None,
            uri: None,
            specific_content: None,
            datasets: Vec::new(),
        }
    }

    /// Attach datasets
    pub fn with_datasets(mut self, datasets: Vec<Dataset>) -> Self {
        self.datasets = datasets;
        self
    }
}

/// Time window of messages to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Inclusive start
    pub from: DateTime<Utc>,
    /// Inclusive end
    pub to: DateTime<Utc>,
}

impl TimeRange {
    /// Create a time range, rejecting empty or inverted windows
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, String> {
        if from >= to {
            return Err(format!(
                "time range start ({}) must be before end ({})",
                format_timestamp(&from),
                format_timestamp(&to)
            ));
        }
        Ok(Self { from, to })
    }

    /// Parse an ISO-8601 / RFC 3339 pair
    ///
    /// # Examples
    ///
    /// ```
    /// use glip_export::domain::TimeRange;
    ///
    /// let range = TimeRange::parse("2019-07-01T00:00:00.000Z", "2019-07-29T23:59:59.999Z").unwrap();
    /// assert_eq!(range.time_from(), "2019-07-01T00:00:00.000Z");
    /// ```
    pub fn parse(from: &str, to: &str) -> Result<Self, String> {
        Self::new(parse_timestamp(from)?, parse_timestamp(to)?)
    }

    /// `timeFrom` in the platform's wire format
    pub fn time_from(&self) -> String {
        format_timestamp(&self.from)
    }

    /// `timeTo` in the platform's wire format
    pub fn time_to(&self) -> String {
        format_timestamp(&self.to)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.time_from(), self.time_to())
    }
}

/// Parse an RFC 3339 timestamp into UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid ISO-8601 timestamp '{value}': {e}"))
}

/// Format a timestamp with millisecond precision and a `Z` suffix
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
