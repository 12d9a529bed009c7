//! Integration tests for dry-run mode
//!
//! A dry run authenticates, submits and polls like a real run but writes no
//! archives.

mod common;

use common::*;
use glip_export::cli::commands::{exit_code_for_summary, EXIT_SUCCESS};
use glip_export::core::export::{ExportCoordinator, ExportOutcome};
use tempfile::TempDir;
use tokio::sync::watch;

#[tokio::test]
async fn test_dry_run_submits_and_polls_but_writes_nothing() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("exports");
    let _token = mock_token(&mut server).await;

    let create = server
        .mock("POST", "/restapi/v1.0/glip/data-export")
        .with_status(202)
        .with_header("content-type", "application/json")
        .with_body(task_body("task-1", "Accepted", &[]))
        .expect(1)
        .create_async()
        .await;
    let uris = vec!["/media/a.zip".to_string(), "/media/b.zip".to_string()];
    let _status = server
        .mock("GET", "/restapi/v1.0/glip/data-export/task-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(task_body("task-1", "Completed", &uris))
        .create_async()
        .await;
    let content = server
        .mock("GET", mockito::Matcher::Regex("^/media/".to_string()))
        .expect(0)
        .create_async()
        .await;

    let mut config = test_config(&server.url(), &output_dir);
    config.application.dry_run = true;

    let (_tx, rx) = watch::channel(false);
    let coordinator = ExportCoordinator::new(config, rx).await.unwrap();
    let summary = coordinator.execute_export().await.unwrap();

    assert_eq!(summary.outcome, ExportOutcome::DryRun);
    assert!(summary.archives.is_empty());
    assert_eq!(
        summary.planned_files,
        vec![output_dir.join(archive_name(0)), output_dir.join(archive_name(1))]
    );
    assert!(!output_dir.exists());
    assert_eq!(exit_code_for_summary(&summary), EXIT_SUCCESS);

    create.assert_async().await;
    content.assert_async().await;
}
