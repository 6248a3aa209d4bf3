//! Generation orchestrator for the aipic MCP server.
//!
//! This module provides the `ImageHandler` struct and parameter types for the
//! `generate_web_image` tool: it validates input, resolves the credential,
//! drives the matching provider client to completion, downloads the result,
//! resizes it when asked to, and writes it to disk.

use crate::credential::{self, ProviderKind};
use crate::imaging;
use crate::provider::{
    DashScopeClient, ImageAsset, ModelScopeClient, ProviderClient, DASHSCOPE_BASE_URL,
    MODELSCOPE_BASE_URL, POLL_INTERVAL,
};
use aipic_mcp_common::config::Config;
use aipic_mcp_common::error::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Native output dimension of both backends; requests at this size skip the
/// resize step entirely.
pub const NATIVE_DIMENSION: u32 = 1024;

/// Timeout for downloading the generated image bytes.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// MIME type reported for generated images.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Parameters for the `generate_web_image` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ImageGenerateParams {
    /// English prompt describing the image to generate
    /// (e.g., "A modern office workspace with laptop and coffee").
    pub prompt: String,

    /// Image width in pixels (default: 1024).
    #[serde(default = "default_dimension")]
    pub width: u32,

    /// Image height in pixels (default: 1024).
    #[serde(default = "default_dimension")]
    pub height: u32,

    /// Optional path where to save the image (default: generated filename).
    #[serde(default, rename = "outputPath", skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,

    /// API key for the image backend. Falls back to the MODELSCOPE_API_KEY /
    /// DASHSCOPE_API_KEY environment variables when omitted.
    #[serde(default, rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_dimension() -> u32 {
    NATIVE_DIMENSION
}

/// Validation error details for generation parameters.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ImageGenerateParams {
    /// Validate the parameters.
    ///
    /// # Returns
    /// - `Ok(())` if all parameters are valid
    /// - `Err(Vec<ValidationError>)` with all validation errors
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.prompt.trim().is_empty() {
            errors.push(ValidationError {
                field: "prompt".to_string(),
                message: "Prompt is required and cannot be empty".to_string(),
            });
        }

        if self.width == 0 {
            errors.push(ValidationError {
                field: "width".to_string(),
                message: "width must be a positive number of pixels".to_string(),
            });
        }

        if self.height == 0 {
            errors.push(ValidationError {
                field: "height".to_string(),
                message: "height must be a positive number of pixels".to_string(),
            });
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// A generated image, written to disk and held in memory for the response.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Where the image was saved.
    pub path: PathBuf,
    /// Final image width in pixels.
    pub width: u32,
    /// Final image height in pixels.
    pub height: u32,
    /// The image bytes as saved.
    pub bytes: Vec<u8>,
    /// The prompt that produced the image.
    pub prompt: String,
}

impl GeneratedImage {
    /// Human-readable success summary for the tool response.
    pub fn summary(&self) -> String {
        format!(
            "Successfully generated web image!\n\nPrompt: {}\nDimensions: {}x{}px\nSaved to: {}",
            self.prompt,
            self.width,
            self.height,
            self.path.display()
        )
    }
}

/// Image generation orchestrator.
///
/// Stateless per request: every call resolves its own credential, owns its
/// own provider client, and discards all intermediate state on return.
pub struct ImageHandler {
    config: Config,
    http: reqwest::Client,
    modelscope_base: String,
    dashscope_base: String,
    poll_interval: Duration,
}

impl ImageHandler {
    /// Create a new handler with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            modelscope_base: MODELSCOPE_BASE_URL.to_string(),
            dashscope_base: DASHSCOPE_BASE_URL.to_string(),
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Create a handler with both backends pointed at a test server and a
    /// short poll interval.
    #[cfg(test)]
    fn with_endpoints(config: Config, base_url: &str, poll_interval: Duration) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            modelscope_base: base_url.trim_end_matches('/').to_string(),
            dashscope_base: base_url.trim_end_matches('/').to_string(),
            poll_interval,
        }
    }

    /// Generate an image from a text prompt.
    ///
    /// # Arguments
    /// * `params` - Generation parameters
    ///
    /// # Returns
    /// * `Ok(GeneratedImage)` - The saved image with its final bytes
    /// * `Err(Error)` - A classified failure; nothing ever panics through
    ///   this boundary
    #[instrument(level = "info", name = "generate_image", skip(self, params), fields(width = params.width, height = params.height))]
    pub async fn generate_image(&self, params: ImageGenerateParams) -> Result<GeneratedImage, Error> {
        params.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            Error::validation(messages.join("; "))
        })?;

        let api_key = credential::resolve(params.api_key.as_deref())?;

        let asset = self
            .request_asset(&api_key, &params.prompt, params.width, params.height)
            .await?;

        let bytes = self.fetch_asset(&asset).await?;

        // Both backends generate at their native size; only re-encode when
        // the caller asked for something else.
        let bytes = if params.width != NATIVE_DIMENSION || params.height != NATIVE_DIMENSION {
            debug!(width = params.width, height = params.height, "Resizing image");
            imaging::resize_to_cover(&bytes, params.width, params.height)
                .map_err(|e| Error::provider(asset_location(&asset), 0, format!("failed to re-encode image: {}", e)))?
        } else {
            bytes
        };

        let path = self.resolve_output_path(params.output_path.as_deref());
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&path, &bytes).await?;
        info!(path = %path.display(), size = bytes.len(), "Image saved");

        Ok(GeneratedImage {
            path,
            width: params.width,
            height: params.height,
            bytes,
            prompt: params.prompt,
        })
    }

    /// Route the request to a provider client and run it to completion.
    ///
    /// Recognized key formats go straight to their backend. Unrecognized
    /// formats are rejected unless fallback is enabled, in which case the
    /// direct backend is tried first and the polling backend retried when
    /// the key itself appears to be the problem. Best-effort behavior, not
    /// a contract.
    async fn request_asset(
        &self,
        api_key: &str,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<ImageAsset, Error> {
        match credential::classify(api_key) {
            Some(kind) => {
                let client = self.client_for(kind, api_key);
                debug!(backend = client.name(), "Submitting generation request");
                client.submit_and_await(prompt, width, height).await
            }
            None if self.config.key_fallback => {
                let direct = self.client_for(ProviderKind::ModelScope, api_key);
                match direct.submit_and_await(prompt, width, height).await {
                    Ok(asset) => Ok(asset),
                    Err(err @ (Error::Auth(_) | Error::Provider { .. })) => {
                        warn!(error = %err, "Direct backend rejected unrecognized key, retrying via polling backend");
                        self.client_for(ProviderKind::DashScope, api_key)
                            .submit_and_await(prompt, width, height)
                            .await
                    }
                    Err(err) => Err(err),
                }
            }
            None => Err(Error::validation("unrecognized credential format")),
        }
    }

    fn client_for(&self, kind: ProviderKind, api_key: &str) -> Box<dyn ProviderClient> {
        match kind {
            ProviderKind::ModelScope => Box::new(
                ModelScopeClient::new(self.http.clone(), api_key)
                    .with_base_url(&self.modelscope_base),
            ),
            ProviderKind::DashScope => Box::new(
                DashScopeClient::new(self.http.clone(), api_key)
                    .with_base_url(&self.dashscope_base)
                    .with_poll_interval(self.poll_interval),
            ),
        }
    }

    /// Fetch the bytes behind an asset reference.
    async fn fetch_asset(&self, asset: &ImageAsset) -> Result<Vec<u8>, Error> {
        match asset {
            ImageAsset::Remote(url) => {
                debug!(url = %url, "Downloading generated image");
                let response = self
                    .http
                    .get(url)
                    .timeout(DOWNLOAD_TIMEOUT)
                    .send()
                    .await
                    .map_err(|e| Error::download(url, e.to_string()))?;

                if !response.status().is_success() {
                    return Err(Error::download(url, format!("HTTP {}", response.status())));
                }

                response
                    .bytes()
                    .await
                    .map(|b| b.to_vec())
                    .map_err(|e| Error::download(url, e.to_string()))
            }
            ImageAsset::Local(path) => tokio::fs::read(path)
                .await
                .map_err(|e| Error::download(path.display().to_string(), e.to_string())),
        }
    }

    /// Decide where the image lands on disk.
    ///
    /// An explicit path is used verbatim. Otherwise a unique filename is
    /// placed in the first usable candidate directory.
    fn resolve_output_path(&self, output_path: Option<&str>) -> PathBuf {
        if let Some(explicit) = output_path {
            return PathBuf::from(explicit);
        }

        let id = Uuid::new_v4().simple().to_string();
        let filename = format!("web_image_{}.jpg", &id[..8]);
        self.pick_output_dir().join(filename)
    }

    /// Candidate order: configured directory (used verbatim, created later if
    /// missing), then `~/Pictures` if it exists, then the OS temp directory,
    /// then the current directory.
    fn pick_output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.config.output_dir {
            return PathBuf::from(dir);
        }

        if let Ok(home) = std::env::var("HOME") {
            let pictures = Path::new(&home).join("Pictures");
            if pictures.is_dir() {
                return pictures;
            }
        }

        let tmp = std::env::temp_dir();
        if tmp.is_dir() {
            return tmp;
        }

        PathBuf::from(".")
    }
}

fn asset_location(asset: &ImageAsset) -> String {
    match asset {
        ImageAsset::Remote(url) => url.clone(),
        ImageAsset::Local(path) => path.display().to_string(),
    }
}
