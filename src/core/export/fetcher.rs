//! Archive fetcher - downloads every dataset of a completed task
//!
//! Datasets are downloaded one at a time, in the order the platform lists
//! them. Dataset `i` is written to
//! `<output_dir>/<prefix>_<creationTime>_<i>.zip`, replacing any existing
//! file of that name.

use crate::adapters::platform::ComplianceExportApi;
use crate::config::ExportConfig;
use crate::domain::archive::{archive_file_name, DEFAULT_FILE_PREFIX};
use crate::domain::{ArchiveFile, Dataset, ExportTask, GlipError, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Writes dataset archives to a local directory
#[derive(Debug, Clone)]
pub struct ArchiveFetcher {
    output_dir: PathBuf,
    file_prefix: String,
}

impl ArchiveFetcher {
    pub fn new(output_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_prefix: file_prefix.into(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(&config.output_dir, &config.file_prefix)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Paths the task's datasets would be written to
    pub fn planned_files(&self, task: &ExportTask) -> Vec<PathBuf> {
        (0..task.datasets.len())
            .map(|index| self.path_for(&task.creation_time, index))
            .collect()
    }

    fn path_for(&self, creation_time: &str, index: usize) -> PathBuf {
        self.output_dir
            .join(archive_file_name(&self.file_prefix, creation_time, index))
    }

    /// Download all datasets of `task`
    ///
    /// Stops at the first failure. Files written before the failure are left
    /// in place.
    pub async fn fetch_all(
        &self,
        api: &dyn ComplianceExportApi,
        task: &ExportTask,
    ) -> Result<Vec<ArchiveFile>> {
        if task.datasets.is_empty() {
            tracing::info!(task_id = %task.id, "Export task has no datasets to download");
            return Ok(Vec::new());
        }

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| {
                GlipError::Io(format!(
                    "Failed to create output directory {}: {e}",
                    self.output_dir.display()
                ))
            })?;

        tracing::info!(
            task_id = %task.id,
            datasets = task.datasets.len(),
            output_dir = %self.output_dir.display(),
            "Downloading export archives"
        );

        let mut archives = Vec::with_capacity(task.datasets.len());
        for (index, dataset) in task.datasets.iter().enumerate() {
            let archive = self
                .fetch_one(api, &task.creation_time, index, dataset)
                .await?;
            archives.push(archive);
        }

        Ok(archives)
    }

    /// Download one dataset and write it to its archive path
    pub async fn fetch_one(
        &self,
        api: &dyn ComplianceExportApi,
        creation_time: &str,
        index: usize,
        dataset: &Dataset,
    ) -> Result<ArchiveFile> {
        let path = self.path_for(creation_time, index);
        tracing::debug!(index, uri = %dataset.uri, path = %path.display(), "Fetching dataset");

        let bytes = api.fetch_content(&dataset.uri).await?;

        if let Some(expected) = dataset.size {
            if expected != bytes.len() as u64 {
                tracing::warn!(
                    index,
                    expected,
                    actual = bytes.len(),
                    "Downloaded size differs from the size reported for the dataset"
                );
            }
        }

        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            GlipError::Io(format!("Failed to write archive {}: {e}", path.display()))
        })?;

        let archive = ArchiveFile {
            index,
            path,
            bytes: bytes.len() as u64,
            sha256: hex_digest(&bytes),
        };
        crate::log_archive_saved!(archive);

        Ok(archive)
    }
}

impl Default for ArchiveFetcher {
    fn default() -> Self {
        Self::new(".", DEFAULT_FILE_PREFIX)
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::testing::ScriptedApi;
    use crate::domain::{TaskId, TaskStatus};
    use tempfile::TempDir;

    const CREATED: &str = "2019-08-01T10:00:00.000Z";

    fn completed_task(uris: &[&str]) -> ExportTask {
        ExportTask::new(TaskId::new("task-1").unwrap(), TaskStatus::Completed, CREATED)
            .with_datasets(uris.iter().map(|u| Dataset::new(*u)).collect())
    }

    #[test]
    fn test_hex_digest() {
        assert_eq!(
            hex_digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_planned_files() {
        let fetcher = ArchiveFetcher::new("/tmp/out", DEFAULT_FILE_PREFIX);
        let files = fetcher.planned_files(&completed_task(&["/a", "/b"]));
        assert_eq!(
            files,
            vec![
                PathBuf::from("/tmp/out/rc-export-reports_2019-08-01T10:00:00.000Z_0.zip"),
                PathBuf::from("/tmp/out/rc-export-reports_2019-08-01T10:00:00.000Z_1.zip"),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_all_writes_one_file_per_dataset() {
        let dir = TempDir::new().unwrap();
        let api = ScriptedApi::new("task-1", CREATED)
            .with_content("/media/0", b"PK\x03\x04first")
            .with_content("/media/1", b"PK\x03\x04second")
            .with_content("/media/2", &[0u8, 255, 1, 254]);
        let fetcher = ArchiveFetcher::new(dir.path().join("nested"), DEFAULT_FILE_PREFIX);

        let archives = fetcher
            .fetch_all(&api, &completed_task(&["/media/0", "/media/1", "/media/2"]))
            .await
            .unwrap();

        assert_eq!(archives.len(), 3);
        assert_eq!(api.fetched(), vec!["/media/0", "/media/1", "/media/2"]);
        for (i, archive) in archives.iter().enumerate() {
            assert_eq!(archive.index, i);
            assert!(archive
                .path
                .ends_with(format!("rc-export-reports_{CREATED}_{i}.zip")));
        }

        let last = std::fs::read(&archives[2].path).unwrap();
        assert_eq!(last, vec![0u8, 255, 1, 254]);
        assert_eq!(archives[2].bytes, 4);
    }

    #[tokio::test]
    async fn test_fetch_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let fetcher = ArchiveFetcher::new(dir.path(), DEFAULT_FILE_PREFIX);
        let existing = dir.path().join(format!("rc-export-reports_{CREATED}_0.zip"));
        std::fs::write(&existing, b"stale content that is longer").unwrap();

        let api = ScriptedApi::new("task-1", CREATED).with_content("/media/0", b"new");
        fetcher
            .fetch_all(&api, &completed_task(&["/media/0"]))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&existing).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_fetch_stops_at_first_failure() {
        let dir = TempDir::new().unwrap();
        let fetcher = ArchiveFetcher::new(dir.path(), DEFAULT_FILE_PREFIX);
        let api = ScriptedApi::new("task-1", CREATED)
            .with_content("/media/0", b"zero")
            .with_content("/media/2", b"two");

        let result = fetcher
            .fetch_all(&api, &completed_task(&["/media/0", "/media/1", "/media/2"]))
            .await;

        assert!(matches!(result, Err(GlipError::Download(_))));
        assert_eq!(api.fetched(), vec!["/media/0", "/media/1"]);
        assert!(dir
            .path()
            .join(format!("rc-export-reports_{CREATED}_0.zip"))
            .exists());
    }

    #[tokio::test]
    async fn test_no_datasets_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("never-created");
        let fetcher = ArchiveFetcher::new(&out, DEFAULT_FILE_PREFIX);
        let api = ScriptedApi::new("task-1", CREATED);

        let archives = fetcher.fetch_all(&api, &completed_task(&[])).await.unwrap();
        assert!(archives.is_empty());
        assert!(!out.exists());
    }
}
