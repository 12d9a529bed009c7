//! Domain identifier types with validation
//!
//! Newtype wrappers keep platform identifiers from being mixed up with
//! arbitrary strings (file names, URIs).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Export task identifier newtype wrapper
///
/// Assigned by the platform when an export task is created. Used verbatim as
/// the last path segment of the status endpoint, so it must not contain `/`.
///
/// # Examples
///
/// ```
/// use glip_export::domain::ids::TaskId;
/// use std::str::FromStr;
///
/// let id = TaskId::from_str("809646015-3104-0").unwrap();
/// assert_eq!(id.as_str(), "809646015-3104-0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Creates a new TaskId from a string
    ///
    /// Returns `Err` if the identifier is blank or contains a path separator.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("Task ID cannot be empty".to_string());
        }
        if trimmed.contains('/') || trimmed.contains('?') {
            return Err(format!("Task ID contains invalid characters: {trimmed}"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the task ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TaskId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_valid() {
        let id = TaskId::new("  4f8e-1  ").unwrap();
        assert_eq!(id.as_str(), "4f8e-1");
        assert_eq!(id.to_string(), "4f8e-1");
    }

    #[test]
    fn test_task_id_rejects_blank_and_separators() {
        assert!(TaskId::new("").is_err());
        assert!(TaskId::new("   ").is_err());
        assert!(TaskId::new("../etc").is_err());
        assert!(TaskId::new("a?b=c").is_err());
    }

    #[test]
    fn test_task_id_serde() {
        let id: TaskId = serde_json::from_str("\"abc-1\"").unwrap();
        assert_eq!(id.as_str(), "abc-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-1\"");
        assert!(serde_json::from_str::<TaskId>("\"\"").is_err());
    }
}
