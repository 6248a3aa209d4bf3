//! Configuration module for loading environment variables and settings.

use crate::error::ConfigError;

/// Application configuration loaded from environment variables.
///
/// Credentials are deliberately not part of the configuration: they are
/// resolved per request (explicit tool argument first, then the provider
/// environment variables) so a long-running server picks up key changes.
#[derive(Debug, Clone)]
pub struct Config {
    /// Preferred directory for generated images when the request does not
    /// name an output path
    pub output_dir: Option<String>,
    /// Try the other backend when a key with an unrecognized format is
    /// rejected by the first one
    pub key_fallback: bool,
    /// HTTP server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if AIPIC_KEY_FALLBACK is set to
    /// something other than a boolean.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let output_dir = std::env::var("AIPIC_OUTPUT_DIR").ok().filter(|d| !d.is_empty());

        let key_fallback = match std::env::var("AIPIC_KEY_FALLBACK") {
            Ok(v) => parse_bool(&v).ok_or_else(|| {
                ConfigError::invalid_value("AIPIC_KEY_FALLBACK", format!("expected true or false, got '{}'", v))
            })?,
            Err(_) => false,
        };

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Ok(Self {
            output_dir,
            key_fallback,
            port,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: None,
            key_fallback: false,
            port: 8080,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
