//! Platform API models
//!
//! Request and response bodies of the RingCentral REST endpoints used by the
//! export flow. These are kept separate from the domain models; `to_domain`
//! converts and validates.

use crate::domain::{
    is_safe_creation_time, Dataset, ExportTask, GlipError, PlatformError, Result,
    SpecificContent, TaskId, TaskStatus, TimeRange,
};
use serde::{Deserialize, Serialize};

/// Body of `POST /restapi/v1.0/glip/data-export`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateExportRequest {
    /// Start of the window, millisecond precision, `Z` suffix
    pub time_from: String,

    /// End of the window, millisecond precision, `Z` suffix
    pub time_to: String,

    /// Optional contact filter
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<ContactFilter>,

    /// Optional chat filter
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chat_ids: Vec<String>,
}

impl CreateExportRequest {
    /// Build a request for a time window with no filters
    pub fn new(range: &TimeRange) -> Self {
        Self {
            time_from: range.time_from(),
            time_to: range.time_to(),
            contacts: Vec::new(),
            chat_ids: Vec::new(),
        }
    }

    /// Restrict to contacts; entries containing `@` are sent as emails
    pub fn with_contacts<I, S>(mut self, contacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.contacts = contacts
            .into_iter()
            .map(|c| ContactFilter::from_config_value(c.as_ref()))
            .collect();
        self
    }

    /// Restrict to chats
    pub fn with_chat_ids<I, S>(mut self, chat_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.chat_ids = chat_ids
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .collect();
        self
    }
}

/// Contact filter entry of an export request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ContactFilter {
    /// Contact by platform id
    Id { id: String },
    /// Contact by email address
    Email { email: String },
}

impl ContactFilter {
    fn from_config_value(value: &str) -> Self {
        let value = value.trim().to_string();
        if value.contains('@') {
            ContactFilter::Email { email: value }
        } else {
            ContactFilter::Id { id: value }
        }
    }
}

/// Export task as returned by the create and status endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTaskResponse {
    /// Task identifier
    pub id: Option<String>,

    /// Canonical URI of the task
    #[serde(default)]
    pub uri: Option<String>,

    /// Creation timestamp
    #[serde(default)]
    pub creation_time: Option<String>,

    /// Last modification timestamp
    #[serde(default)]
    pub last_modified_time: Option<String>,

    /// Task status
    pub status: Option<String>,

    /// Echo of the requested time window and filters
    #[serde(default)]
    pub specific_content: Option<SpecificContentResponse>,

    /// Produced archives (only once completed)
    #[serde(default)]
    pub datasets: Vec<DatasetResponse>,
}

/// `specificContent` block of a task response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificContentResponse {
    #[serde(default)]
    pub time_from: Option<String>,

    #[serde(default)]
    pub time_to: Option<String>,

    #[serde(default)]
    pub contacts: Vec<ContactResponse>,

    #[serde(default)]
    pub chat_ids: Vec<String>,
}

/// Contact entry of a `specificContent` block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactResponse {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

impl SpecificContentResponse {
    fn to_domain(&self) -> SpecificContent {
        SpecificContent {
            time_from: self.time_from.clone(),
            time_to: self.time_to.clone(),
            contacts: self
                .contacts
                .iter()
                .filter_map(|c| c.id.clone().or_else(|| c.email.clone()))
                .collect(),
            chat_ids: self.chat_ids.clone(),
        }
    }
}

/// Dataset entry of a task response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetResponse {
    /// Dataset identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Content URI
    pub uri: Option<String>,

    /// Archive size in bytes
    #[serde(default)]
    pub size: Option<u64>,

    /// Link expiry
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl ExportTaskResponse {
    /// Convert to the domain task
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidResponse`] if the id, status or a
    /// dataset URI is missing, if a completed task has no creation time, or
    /// if the creation time cannot be used in a file name.
    pub fn to_domain(&self) -> Result<ExportTask> {
        let id = self
            .id
            .as_deref()
            .ok_or_else(|| invalid("export task response has no id"))?;
        let id = TaskId::new(id).map_err(|e| invalid(&e))?;

        let status = self
            .status
            .as_deref()
            .ok_or_else(|| invalid("export task response has no status"))?;
        let status = TaskStatus::from(status);

        let creation_time = self.creation_time.clone().unwrap_or_default();
        if creation_time.trim().is_empty() {
            if status.is_completed() {
                return Err(invalid("completed export task response has no creationTime"));
            }
        } else if !is_safe_creation_time(&creation_time) {
            return Err(invalid(&format!(
                "export task creationTime {creation_time:?} cannot be used in a file name"
            )));
        }

        let datasets = self
            .datasets
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let uri = d
                    .uri
                    .as_deref()
                    .filter(|u| !u.trim().is_empty())
                    .ok_or_else(|| invalid(&format!("dataset {i} has no uri")))?;
                Ok(Dataset {
                    uri: uri.to_string(),
                    id: d.id.clone(),
                    size: d.size,
                    expires_at: d.expires_at.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut task = ExportTask::new(id, status, creation_time).with_datasets(datasets);
        task.last_modified_time = self.last_modified_time.clone();
        task.uri = self.uri.clone();
        task.specific_content = self
            .specific_content
            .as_ref()
            .map(SpecificContentResponse::to_domain);

        Ok(task)
    }
}

fn invalid(message: &str) -> GlipError {
    GlipError::Platform(PlatformError::InvalidResponse(message.to_string()))
}

/// OAuth token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Bearer token
    pub access_token: String,

    /// Token type, always "bearer"
    #[serde(default)]
    pub token_type: String,

    /// Lifetime of the access token in seconds
    pub expires_in: u64,

    /// Refresh token
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Error body returned by the platform on non-success responses
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Machine-readable code, e.g. "CMN-102"
    #[serde(default)]
    pub error_code: Option<String>,

    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,

    /// OAuth-style error (token endpoint)
    #[serde(default, rename = "error_description")]
    pub error_description: Option<String>,
}

impl ApiErrorResponse {
    /// Best human-readable description of a failed response body
    pub fn describe(body: &str) -> String {
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap_or_default();
        let message = parsed.message.or(parsed.error_description);
        match (parsed.error_code, message) {
            (Some(code), Some(msg)) => format!("{code}: {msg}"),
            (None, Some(msg)) => msg,
            (Some(code), None) => code,
            (None, None) => body.trim().to_string(),
        }
    }
}
