//! Scripted in-memory platform used by the export unit tests

use crate::adapters::platform::{ComplianceExportApi, CreateExportRequest};
use crate::domain::{
    Dataset, ExportTask, GlipError, PlatformError, Result, TaskId, TaskStatus,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Replays a fixed sequence of task snapshots
pub struct ScriptedApi {
    task_id: TaskId,
    creation_time: String,
    statuses: Mutex<VecDeque<ExportTask>>,
    contents: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<CreateExportRequest>>,
    status_calls: Mutex<u32>,
    fetched: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new(task_id: &str, creation_time: &str) -> Self {
        Self {
            task_id: TaskId::new(task_id).unwrap(),
            creation_time: creation_time.to_string(),
            statuses: Mutex::new(VecDeque::new()),
            contents: HashMap::new(),
            requests: Mutex::new(Vec::new()),
            status_calls: Mutex::new(0),
            fetched: Mutex::new(Vec::new()),
        }
    }

    fn snapshot(&self, status: &str) -> ExportTask {
        ExportTask::new(
            self.task_id.clone(),
            TaskStatus::from(status),
            self.creation_time.clone(),
        )
    }

    pub fn then_status(self, status: &str) -> Self {
        let task = self.snapshot(status);
        self.statuses.lock().unwrap().push_back(task);
        self
    }

    pub fn then_completed(self, uris: &[&str]) -> Self {
        let task = self
            .snapshot("Completed")
            .with_datasets(uris.iter().map(|uri| Dataset::new(*uri)).collect());
        self.statuses.lock().unwrap().push_back(task);
        self
    }

    pub fn with_content(mut self, uri: &str, bytes: &[u8]) -> Self {
        self.contents.insert(uri.to_string(), bytes.to_vec());
        self
    }

    pub fn status_calls(&self) -> u32 {
        *self.status_calls.lock().unwrap()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<CreateExportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ComplianceExportApi for ScriptedApi {
    async fn create_export_task(&self, request: &CreateExportRequest) -> Result<ExportTask> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.snapshot("Accepted"))
    }

    async fn get_export_task(&self, task_id: &TaskId) -> Result<ExportTask> {
        *self.status_calls.lock().unwrap() += 1;
        if task_id != &self.task_id {
            return Err(PlatformError::TaskNotFound(task_id.to_string()).into());
        }
        self.statuses.lock().unwrap().pop_front().ok_or_else(|| {
            GlipError::Platform(PlatformError::ServerError {
                status: 503,
                message: "script exhausted".to_string(),
            })
        })
    }

    async fn fetch_content(&self, content_uri: &str) -> Result<Vec<u8>> {
        self.fetched.lock().unwrap().push(content_uri.to_string());
        self.contents
            .get(content_uri)
            .cloned()
            .ok_or_else(|| GlipError::Download(format!("no content for {content_uri}")))
    }

    fn server_url(&self) -> &str {
        "https://platform.example.com"
    }
}
