//! Domain error types
//!
//! This module defines the error hierarchy for glip-export.
//! Errors are domain-specific and don't expose third-party HTTP client types.

use thiserror::Error;

/// Main glip-export error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum GlipError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Errors returned by (or while talking to) the messaging platform
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Archive download errors
    #[error("Download error: {0}")]
    Download(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl GlipError {
    /// Whether the error came from authenticating or reaching the platform
    ///
    /// The CLI maps these to the "connection" exit code.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            GlipError::Platform(
                PlatformError::ConnectionFailed(_)
                    | PlatformError::AuthenticationFailed(_)
                    | PlatformError::Timeout(_)
            )
        )
    }
}

/// Platform-specific errors
///
/// Errors that occur when interacting with the RingCentral REST API.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to connect to the platform
    #[error("Failed to connect to platform: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Export task not found
    #[error("Export task not found: {0}")]
    TaskNotFound(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after: {0}")]
    RateLimitExceeded(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl PlatformError {
    /// Classify a non-success HTTP status into a platform error
    ///
    /// `message` is whatever the server said, usually the `message` field of
    /// its JSON error body.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => PlatformError::AuthenticationFailed(message),
            404 => PlatformError::TaskNotFound(message),
            429 => PlatformError::RateLimitExceeded(message),
            500..=599 => PlatformError::ServerError { status, message },
            _ => PlatformError::ClientError { status, message },
        }
    }
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PlatformError::Timeout(err.to_string())
        } else if err.is_decode() {
            PlatformError::InvalidResponse(err.to_string())
        } else {
            PlatformError::ConnectionFailed(err.to_string())
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for GlipError {
    fn from(err: std::io::Error) -> Self {
        GlipError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for GlipError {
    fn from(err: serde_json::Error) -> Self {
        GlipError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for GlipError {
    fn from(err: toml::de::Error) -> Self {
        GlipError::Configuration(format!("TOML parse error: {err}"))
    }
}
