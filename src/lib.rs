// glip-export - Glip compliance data export tool
// Copyright (c) 2025 glip-export Contributors
// Licensed under the MIT License

//! # glip-export - Glip compliance data export
//!
//! glip-export pulls a compliance export of Glip (team messaging) data from
//! the RingCentral platform and saves the resulting archives locally.
//!
//! ## Overview
//!
//! An export run:
//! - **Authenticates** with the OAuth password grant
//! - **Requests** one export task for a time window
//! - **Polls** the task every few seconds until it is no longer running
//! - **Downloads** each dataset to `rc-export-reports_<creationTime>_<index>.zip`
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export workflow (request, poll, fetch, coordination)
//! - [`adapters`] - Platform REST client and authentication
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glip_export::config::load_config;
//! use glip_export::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("glip-export.toml")?;
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//!     let coordinator = ExportCoordinator::new(config, shutdown_rx).await?;
//!     let summary = coordinator.execute_export().await?;
//!
//!     println!("Downloaded {} archives", summary.archives.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All library operations return [`domain::Result`], whose error type is
//! [`domain::GlipError`]. Platform failures are classified by
//! [`domain::PlatformError`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
