//! Error types for the common library.
//!
//! This module provides a unified error hierarchy using `thiserror` for consistent
//! error handling across the aipic MCP server.
//!
//! # Error Categories
//!
//! - `ConfigError`: Missing or invalid configuration
//! - `Error::Validation`: Input validation failures (bad prompt, missing key)
//! - `Error::Auth`: Credential rejected by a provider
//! - `Error::RateLimit`: Provider throttled the request
//! - `Error::Timeout`: Transport timeout or polling-ceiling timeout
//! - `Error::Provider`: Upstream-reported failure or malformed response
//! - `Error::Download`: Fetching the generated image bytes failed
//! - `Error::Filesystem`: Directory creation / file write failures

use thiserror::Error;

/// Unified error type for the aipic MCP server.
///
/// Every failure mode of a generation request maps onto exactly one of these
/// variants, enabling the tool surface to report a single classified error
/// message to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (malformed env vars)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Credential rejected by the provider (HTTP 401)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Provider throttled the request (HTTP 429)
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Transport timeout or polling ceiling reached
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Provider errors with endpoint and HTTP status context
    ///
    /// Includes the API endpoint that failed, the HTTP status code (0 when the
    /// failure happened before a status was received), and the upstream message.
    #[error("Provider error for {endpoint} (HTTP {status_code}): {message}")]
    Provider {
        /// The API endpoint that was called
        endpoint: String,
        /// HTTP status code returned by the provider
        status_code: u16,
        /// Error message from the provider or describing the failure
        message: String,
    },

    /// Fetching the final image bytes failed
    #[error("Failed to download image from {url}: {message}")]
    Download {
        /// The asset location that was being fetched
        url: String,
        /// Description of the failure
        message: String,
    },

    /// File system I/O errors
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),
}

impl Error {
    /// Create a new validation error.
    ///
    /// # Example
    ///
    /// ```
    /// use aipic_mcp_common::error::Error;
    ///
    /// let err = Error::validation("prompt cannot be empty");
    /// assert!(err.to_string().contains("prompt cannot be empty"));
    /// ```
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Create a new authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Error::Auth(message.into())
    }

    /// Create a new rate-limit error.
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Error::RateLimit(message.into())
    }

    /// Create a new timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Error::Timeout(message.into())
    }

    /// Create a new provider error with endpoint, status code, and message.
    ///
    /// # Example
    ///
    /// ```
    /// use aipic_mcp_common::error::Error;
    ///
    /// let err = Error::provider("https://api.example.com/v1/generate", 500, "boom");
    /// assert!(err.to_string().contains("api.example.com"));
    /// assert!(err.to_string().contains("500"));
    /// ```
    pub fn provider(
        endpoint: impl Into<String>,
        status_code: u16,
        message: impl Into<String>,
    ) -> Self {
        Error::Provider {
            endpoint: endpoint.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Create a new download error.
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Download {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Configuration errors.
///
/// These errors occur when loading or validating configuration from
/// environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
