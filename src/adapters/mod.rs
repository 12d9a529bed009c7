//! External system integrations for glip-export.
//!
//! - [`platform`] - RingCentral REST API (authentication and compliance export)
//!
//! # Design Pattern
//!
//! The export flow depends on the [`platform::ComplianceExportApi`] trait, not
//! on the HTTP client, so the core logic can be exercised with an in-memory
//! implementation:
//!
//! ```rust,no_run
//! use glip_export::adapters::platform::{ComplianceExportApi, PlatformClient};
//! use glip_export::config::PlatformConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> glip_export::domain::Result<()> {
//! let api: Arc<dyn ComplianceExportApi> =
//!     Arc::new(PlatformClient::connect(PlatformConfig::default()).await?);
//! println!("{}", api.server_url());
//! # Ok(())
//! # }
//! ```

pub mod platform;
