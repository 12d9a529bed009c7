//! RingCentral platform adapter
//!
//! This module provides the integration with the RingCentral REST API:
//! authentication, the compliance export endpoints, and API models.

pub mod api;
pub mod auth;
pub mod client;
pub mod models;

pub use api::ComplianceExportApi;
pub use auth::PasswordGrantAuth;
pub use client::PlatformClient;
pub use models::{ContactFilter, CreateExportRequest, ExportTaskResponse};
