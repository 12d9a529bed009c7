//! Configuration management for glip-export.
//!
//! glip-export uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `GLIP_EXPORT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level, dry-run
//! - [`PlatformConfig`] - Server URL and credentials
//! - [`ExportConfig`] - Time window, filters, output, polling behaviour
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [platform]
//! server_url = "https://platform.ringcentral.com"
//! client_id = "my-client-id"
//! client_secret = "${GLIP_EXPORT_CLIENT_SECRET}"
//! username = "+16505550100"
//! password = "${GLIP_EXPORT_PASSWORD}"
//!
//! [export]
//! time_from = "2019-07-01T00:00:00.000Z"
//! time_to = "2019-07-29T23:59:59.999Z"
//! output_dir = "./archives"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_unvalidated};
pub use schema::{
    ApplicationConfig, Environment, ExportConfig, GlipConfig, LoggingConfig, PlatformConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
