//! Export coordinator - main orchestrator for the export process
//!
//! This module wires the requester, poller and fetcher together against one
//! platform connection and turns the result into an [`ExportSummary`].

use crate::adapters::platform::{ComplianceExportApi, PlatformClient};
use crate::config::GlipConfig;
use crate::core::export::fetcher::ArchiveFetcher;
use crate::core::export::poller::{PollOutcome, PollPolicy, StatusPoller};
use crate::core::export::requester::ExportRequester;
use crate::core::export::summary::{ExportOutcome, ExportSummary};
use crate::domain::{ExportTask, GlipError, Result, TaskId};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Export coordinator
pub struct ExportCoordinator {
    config: GlipConfig,
    api: Arc<dyn ComplianceExportApi>,
    shutdown: watch::Receiver<bool>,
}

impl ExportCoordinator {
    /// Create a coordinator connected to the configured platform
    ///
    /// Authenticates immediately so bad credentials fail before any export
    /// work starts.
    pub async fn new(config: GlipConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        let client = PlatformClient::connect(config.platform.clone()).await?;
        Ok(Self::with_api(config, Arc::new(client), shutdown))
    }

    /// Create a coordinator on top of an existing API implementation
    pub fn with_api(
        config: GlipConfig,
        api: Arc<dyn ComplianceExportApi>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            api,
            shutdown,
        }
    }

    fn poller(&self) -> StatusPoller {
        StatusPoller::new(PollPolicy::from_config(&self.config.export))
    }

    fn fetcher(&self) -> ArchiveFetcher {
        ArchiveFetcher::from_config(&self.config.export)
    }

    fn dry_run(&self) -> bool {
        self.config.application.dry_run
    }

    /// Execute the export
    ///
    /// Submits one export task for the configured window, polls it until it
    /// leaves the running states, and downloads its datasets if it completed.
    pub async fn execute_export(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        tracing::info!(
            server_url = %self.api.server_url(),
            dry_run = self.dry_run(),
            "Starting export process"
        );

        let requester = ExportRequester::from_config(&self.config.export)?;
        let task = requester.submit(self.api.as_ref()).await?;

        self.follow_task(&task.id, start_time).await
    }

    /// Poll and download an already submitted task
    pub async fn resume_export(&self, task_id: &TaskId) -> Result<ExportSummary> {
        let start_time = Instant::now();
        tracing::info!(task_id = %task_id, dry_run = self.dry_run(), "Resuming export task");

        self.follow_task(task_id, start_time).await
    }

    /// Query the task status once
    pub async fn task_status(&self, task_id: &TaskId) -> Result<ExportTask> {
        self.api.get_export_task(task_id).await
    }

    /// Download the archives of a task without polling
    ///
    /// A task that is not `Completed` yields an [`ExportOutcome::Stopped`]
    /// summary and no files.
    pub async fn download_completed(&self, task_id: &TaskId) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let task = self.api.get_export_task(task_id).await?;

        let summary = if task.status.is_completed() {
            self.finish_completed(task, 1).await?
        } else {
            tracing::warn!(
                task_id = %task_id,
                status = %task.status,
                "Export task is not completed, nothing to download"
            );
            summary_for(&task, 1, ExportOutcome::Stopped)
        };

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    async fn follow_task(&self, task_id: &TaskId, start_time: Instant) -> Result<ExportSummary> {
        let mut shutdown = self.shutdown.clone();
        let outcome = self
            .poller()
            .poll(self.api.as_ref(), task_id, &mut shutdown)
            .await?;

        let summary = match outcome {
            PollOutcome::Completed { task, attempts } => {
                if *shutdown.borrow() {
                    summary_for(&task, attempts, ExportOutcome::Interrupted)
                } else {
                    self.finish_completed(task, attempts).await?
                }
            }
            PollOutcome::Stopped { task, attempts } => {
                summary_for(&task, attempts, ExportOutcome::Stopped)
            }
            PollOutcome::Exhausted { task, attempts } => {
                summary_for(&task, attempts, ExportOutcome::Exhausted)
            }
            PollOutcome::Interrupted { last, attempts } => {
                let mut summary = match &last {
                    Some(task) => summary_for(task, attempts, ExportOutcome::Interrupted),
                    None => ExportSummary::new(ExportOutcome::Interrupted),
                };
                summary.task_id.get_or_insert_with(|| task_id.clone());
                summary.poll_attempts = attempts;
                summary
            }
        };

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    async fn finish_completed(&self, task: ExportTask, attempts: u32) -> Result<ExportSummary> {
        let fetcher = self.fetcher();

        if self.dry_run() {
            let mut summary = summary_for(&task, attempts, ExportOutcome::DryRun);
            summary.planned_files = fetcher.planned_files(&task);
            tracing::info!(
                task_id = %task.id,
                files = summary.planned_files.len(),
                "Dry run: skipping archive download"
            );
            return Ok(summary);
        }

        let archives = fetcher
            .fetch_all(self.api.as_ref(), &task)
            .await
            .map_err(|e| match e {
                GlipError::Download(msg) => {
                    GlipError::Download(format!("task {}: {msg}", task.id))
                }
                other => other,
            })?;

        let mut summary = summary_for(&task, attempts, ExportOutcome::Completed);
        summary.archives = archives;
        Ok(summary)
    }
}

fn summary_for(task: &ExportTask, attempts: u32, outcome: ExportOutcome) -> ExportSummary {
    let mut summary = ExportSummary::new(outcome);
    summary.task_id = Some(task.id.clone());
    summary.creation_time = Some(task.creation_time.clone());
    summary.final_status = Some(task.status.clone());
    summary.poll_attempts = attempts;
    summary
}
