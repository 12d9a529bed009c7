//! Compliance export API trait
//!
//! This module defines the `ComplianceExportApi` trait that abstracts the three
//! platform calls the export flow needs. The core export logic only talks to
//! this trait, so it can run against the real REST client or a scripted
//! in-memory implementation.

use super::models::CreateExportRequest;
use crate::domain::{ExportTask, Result, TaskId};
use async_trait::async_trait;

/// The platform calls used by the export flow
///
/// # Example
///
/// ```no_run
/// use glip_export::adapters::platform::{ComplianceExportApi, CreateExportRequest, PlatformClient};
/// use glip_export::config::PlatformConfig;
/// use glip_export::domain::TimeRange;
///
/// # async fn example() -> glip_export::domain::Result<()> {
/// let client = PlatformClient::connect(PlatformConfig::default()).await?;
///
/// let range = TimeRange::parse("2019-07-01T00:00:00Z", "2019-07-29T23:59:59.999Z")
///     .map_err(glip_export::domain::GlipError::Validation)?;
/// let task = client.create_export_task(&CreateExportRequest::new(&range)).await?;
/// let task = client.get_export_task(&task.id).await?;
/// for dataset in &task.datasets {
///     let bytes = client.fetch_content(&dataset.uri).await?;
///     println!("{} bytes", bytes.len());
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ComplianceExportApi: Send + Sync {
    /// Submit a new export task
    ///
    /// # Errors
    ///
    /// Returns an error on any non-success response or transport failure.
    async fn create_export_task(&self, request: &CreateExportRequest) -> Result<ExportTask>;

    /// Fetch the current state of an export task
    ///
    /// # Errors
    ///
    /// Returns an error on any non-success response or transport failure.
    async fn get_export_task(&self, task_id: &TaskId) -> Result<ExportTask>;

    /// Download the full content behind a dataset URI
    ///
    /// The bytes are returned exactly as served.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI cannot be resolved, the content endpoint
    /// answers with a non-success status, or the transfer fails.
    async fn fetch_content(&self, content_uri: &str) -> Result<Vec<u8>>;

    /// Base URL of the platform server
    fn server_url(&self) -> &str;
}
