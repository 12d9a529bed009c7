//! Export requester - submits the export task

use crate::adapters::platform::{ComplianceExportApi, CreateExportRequest};
use crate::config::ExportConfig;
use crate::domain::{ExportTask, GlipError, Result, TimeRange};

/// Builds and submits the export-create request
#[derive(Debug, Clone)]
pub struct ExportRequester {
    range: TimeRange,
    contacts: Vec<String>,
    chat_ids: Vec<String>,
}

impl ExportRequester {
    /// Requester for a time window with no contact or chat filter
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            contacts: Vec::new(),
            chat_ids: Vec::new(),
        }
    }

    /// Requester built from the `[export]` section
    ///
    /// # Errors
    ///
    /// Returns [`GlipError::Validation`] if the time window does not parse.
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        let range = config.time_range().map_err(GlipError::Validation)?;
        Ok(Self::new(range)
            .with_contacts(config.contacts.clone())
            .with_chat_ids(config.chat_ids.clone()))
    }

    /// Restrict the export to these contacts
    pub fn with_contacts(mut self, contacts: Vec<String>) -> Self {
        self.contacts = contacts;
        self
    }

    /// Restrict the export to these chats
    pub fn with_chat_ids(mut self, chat_ids: Vec<String>) -> Self {
        self.chat_ids = chat_ids;
        self
    }

    /// The export window
    pub fn range(&self) -> &TimeRange {
        &self.range
    }

    /// Request body that will be sent
    pub fn request(&self) -> CreateExportRequest {
        CreateExportRequest::new(&self.range)
            .with_contacts(&self.contacts)
            .with_chat_ids(&self.chat_ids)
    }

    /// Submit one export task
    ///
    /// Any failure is returned to the caller; nothing is retried.
    pub async fn submit(&self, api: &dyn ComplianceExportApi) -> Result<ExportTask> {
        tracing::info!(
            time_from = %self.range.time_from(),
            time_to = %self.range.time_to(),
            "Creating export task"
        );

        let task = api.create_export_task(&self.request()).await?;

        tracing::info!(
            task_id = %task.id,
            status = %task.status,
            creation_time = %task.creation_time,
            "Export task created"
        );

        Ok(task)
    }
}
