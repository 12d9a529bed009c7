//! Configuration schema types
//!
//! This module defines the configuration structure for glip-export.

use crate::config::{secret_string, SecretString};
use crate::domain::archive::DEFAULT_FILE_PREFIX;
use crate::domain::TimeRange;
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main glip-export configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlipConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Platform connection and credentials
    pub platform: PlatformConfig,

    /// Export request, polling and download settings
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GlipConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.platform.validate(&self.environment)?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (poll but don't write archives)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Platform server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the platform API server
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// OAuth client ID of the app registration
    pub client_id: String,

    /// OAuth client secret of the app registration
    /// Stored securely in memory and automatically zeroized on drop
    pub client_secret: SecretString,

    /// Login name (phone number or email)
    pub username: String,

    /// Phone extension (optional)
    #[serde(default)]
    pub extension: Option<String>,

    /// Account password
    /// Stored securely in memory and automatically zeroized on drop
    pub password: SecretString,

    /// Timeout in seconds for each HTTP request
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: disabling TLS verification exposes credentials to
    /// man-in-the-middle attacks. Rejected in production environments.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl PlatformConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.server_url.is_empty() {
            return Err("platform.server_url cannot be empty".to_string());
        }

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err("platform.server_url must start with http:// or https://".to_string());
        }

        if url::Url::parse(&self.server_url).is_err() {
            return Err(format!(
                "platform.server_url is not a valid URL: {}",
                self.server_url
            ));
        }

        if self.client_id.trim().is_empty() {
            return Err("platform.client_id cannot be empty".to_string());
        }

        if self.client_secret.expose_secret().is_empty() {
            return Err("platform.client_secret cannot be empty".to_string());
        }

        if self.username.trim().is_empty() {
            return Err("platform.username cannot be empty".to_string());
        }

        if self.password.expose_secret().is_empty() {
            return Err("platform.password cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("platform.timeout_seconds must be > 0".to_string());
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                Set 'tls_verify = true', or use 'environment = \"development\"' for local testing."
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Extension with blank values treated as absent
    pub fn extension(&self) -> Option<&str> {
        self.extension
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            client_id: String::new(),
            client_secret: secret_string(String::new()),
            username: String::new(),
            extension: None,
            password: secret_string(String::new()),
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Start of the export window (ISO 8601, UTC)
    pub time_from: String,

    /// End of the export window (ISO 8601, UTC)
    pub time_to: String,

    /// Restrict the export to these contacts (ids or emails); empty = all
    #[serde(default)]
    pub contacts: Vec<String>,

    /// Restrict the export to these chats; empty = all
    #[serde(default)]
    pub chat_ids: Vec<String>,

    /// Directory the archives are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Archive file name prefix
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Delay between status polls in seconds
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,

    /// Maximum number of status polls (0 = poll until the task finishes)
    #[serde(default)]
    pub max_poll_attempts: u32,

    /// Multiplier applied to the delay after each poll (1.0 = fixed interval)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Upper bound for the delay between polls in seconds
    #[serde(default = "default_max_poll_interval_seconds")]
    pub max_poll_interval_seconds: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        self.time_range()
            .map_err(|e| format!("export time range is invalid: {e}"))?;

        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        if self.file_prefix.trim().is_empty() {
            return Err("export.file_prefix cannot be empty".to_string());
        }

        if self.file_prefix.contains('/') || self.file_prefix.contains('\\') {
            return Err(format!(
                "export.file_prefix must not contain path separators, got '{}'",
                self.file_prefix
            ));
        }

        if self.poll_interval_seconds == 0 {
            return Err("export.poll_interval_seconds must be > 0".to_string());
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(format!(
                "export.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        if self.max_poll_interval_seconds < self.poll_interval_seconds {
            return Err(format!(
                "export.max_poll_interval_seconds ({}) must be >= export.poll_interval_seconds ({})",
                self.max_poll_interval_seconds, self.poll_interval_seconds
            ));
        }

        if self.contacts.iter().any(|c| c.trim().is_empty()) {
            return Err("export.contacts cannot contain empty entries".to_string());
        }

        if self.chat_ids.iter().any(|c| c.trim().is_empty()) {
            return Err("export.chat_ids cannot contain empty entries".to_string());
        }

        Ok(())
    }

    /// Parsed export window
    pub fn time_range(&self) -> Result<TimeRange, String> {
        TimeRange::parse(&self.time_from, &self.time_to)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            time_from: "2019-07-01T00:00:00.000Z".to_string(),
            time_to: "2019-07-29T23:59:59.999Z".to_string(),
            contacts: vec![],
            chat_ids: vec![],
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            poll_interval_seconds: default_poll_interval_seconds(),
            max_poll_attempts: 0,
            backoff_multiplier: default_backoff_multiplier(),
            max_poll_interval_seconds: default_max_poll_interval_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_server_url() -> String {
    "https://platform.ringcentral.com".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}

fn default_poll_interval_seconds() -> u64 {
    5
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

fn default_max_poll_interval_seconds() -> u64 {
    300
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
