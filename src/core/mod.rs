//! Core business logic for glip-export.
//!
//! # Export Workflow
//!
//! 1. **Authenticate**: Obtain a bearer token with the password grant
//! 2. **Request**: Submit one export task for the configured time window
//! 3. **Poll**: Query the task status every few seconds until it finishes
//! 4. **Fetch**: Download each dataset to `<prefix>_<creationTime>_<index>.zip`
//! 5. **Report**: Generate export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use glip_export::config::load_config;
//! use glip_export::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("glip-export.toml")?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = ExportCoordinator::new(config, shutdown_rx).await?;
//!
//! let summary = coordinator.execute_export().await?;
//! for archive in &summary.archives {
//!     println!("{}", archive.path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod export;
