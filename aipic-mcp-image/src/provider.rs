//! Provider clients for the two text-to-image backends.
//!
//! Both backends accept a prompt and eventually yield a URL for the generated
//! image, but their contracts differ: ModelScope answers the generation
//! request synchronously, while DashScope hands back a task id that has to be
//! polled until it reaches a terminal state. The [`ProviderClient`] trait
//! hides that difference behind one `submit_and_await` capability.

use aipic_mcp_common::error::Error;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Production base URL for the ModelScope inference API.
pub const MODELSCOPE_BASE_URL: &str = "https://api-inference.modelscope.cn";

/// Production base URL for the DashScope API.
pub const DASHSCOPE_BASE_URL: &str = "https://dashscope.aliyuncs.com";

/// Model identifier sent to ModelScope.
pub const MODELSCOPE_MODEL: &str = "MusePublic/489_ckpt_FLUX_1";

/// Model identifier sent to DashScope.
pub const DASHSCOPE_MODEL: &str = "wanx-v1";

/// Denoising step count submitted with every DashScope task.
pub const DASHSCOPE_STEPS: u32 = 20;

/// Timeout for the synchronous ModelScope generation call.
pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for the DashScope task submission call.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for a single task status read.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(15);

/// Maximum number of status reads before a task is declared timed out.
pub const POLL_MAX_ATTEMPTS: u32 = 30;

/// Delay between consecutive status reads.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Reference to generated image bytes: either a remote URL to download or a
/// file a provider already wrote locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageAsset {
    /// Image reachable over HTTP.
    Remote(String),
    /// Image already present on the local filesystem.
    Local(PathBuf),
}

/// One backend's request/response contract.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &'static str;

    /// Submit a generation request and drive it to completion, returning a
    /// reference to the generated image.
    async fn submit_and_await(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<ImageAsset, Error>;
}

/// Classify a non-success HTTP response into the unified error type.
///
/// 401 and 429 map to dedicated kinds regardless of the response body; other
/// statuses become provider errors carrying the upstream `message` field when
/// the body parses as JSON.
async fn check_status(endpoint: &str, response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 => Err(Error::auth(
            "Invalid API key. Check your ModelScope or DashScope credentials.",
        )),
        429 => Err(Error::rate_limit("Rate limit exceeded. Please try again later.")),
        code => {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(&body).unwrap_or(body);
            Err(Error::provider(endpoint, code, message))
        }
    }
}

/// Map a transport-level failure: timeouts get their own kind, everything
/// else is a provider error without an HTTP status.
fn transport_error(endpoint: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::timeout(format!("request to {} timed out", endpoint))
    } else {
        Error::provider(endpoint, 0, format!("request failed: {}", err))
    }
}

/// Extract the `message` field from a JSON error body, if there is one.
fn upstream_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}

// =============================================================================
// Direct backend: ModelScope
// =============================================================================

/// Client for the synchronous ModelScope image generation endpoint.
pub struct ModelScopeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ModelScopeClient {
    /// Create a client against the production endpoint.
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: MODELSCOPE_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (used by the orchestrator and by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ProviderClient for ModelScopeClient {
    fn name(&self) -> &'static str {
        "modelscope"
    }

    async fn submit_and_await(
        &self,
        prompt: &str,
        _width: u32,
        _height: u32,
    ) -> Result<ImageAsset, Error> {
        // ModelScope generates at the model's native size; resizing happens
        // downstream.
        let endpoint = format!("{}/v1/images/generations", self.base_url);
        debug!(endpoint = %endpoint, "Requesting synchronous image generation");

        let request = ModelScopeRequest {
            model: MODELSCOPE_MODEL,
            prompt,
        };

        let response = self
            .http
            .post(&endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .timeout(GENERATE_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport_error(&endpoint, e))?;

        let response = check_status(&endpoint, response).await?;

        let body: ModelScopeResponse = response.json().await.map_err(|e| {
            Error::provider(&endpoint, 200, format!("failed to parse response: {}", e))
        })?;

        let url = body
            .images
            .into_iter()
            .filter_map(|image| image.url)
            .next()
            .ok_or_else(|| Error::provider(&endpoint, 200, "no image URL found in response"))?;

        info!(backend = self.name(), "Image generated");
        Ok(ImageAsset::Remote(url))
    }
}

#[derive(Debug, Serialize)]
struct ModelScopeRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct ModelScopeResponse {
    #[serde(default)]
    images: Vec<ModelScopeImage>,
}

#[derive(Debug, Deserialize)]
struct ModelScopeImage {
    url: Option<String>,
}

// =============================================================================
// Task-polling backend: DashScope
// =============================================================================

/// Client for the asynchronous DashScope text2image endpoint.
///
/// Generation is a two-step contract: submit a task, then poll its status
/// until it reports `SUCCEEDED` or `FAILED`. The poll loop is bounded by
/// [`POLL_MAX_ATTEMPTS`] reads spaced [`POLL_INTERVAL`] apart.
pub struct DashScopeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
}

impl DashScopeClient {
    /// Create a client against the production endpoint.
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: DASHSCOPE_BASE_URL.to_string(),
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Override the API base URL (used by the orchestrator and by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the delay between status reads (tests use a short interval).
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Submit a generation task, returning its id.
    async fn submit_task(&self, prompt: &str, width: u32, height: u32) -> Result<String, Error> {
        let endpoint = format!(
            "{}/api/v1/services/aigc/text2image/image-synthesis",
            self.base_url
        );
        debug!(endpoint = %endpoint, "Submitting generation task");

        let request = SynthesisRequest {
            model: DASHSCOPE_MODEL,
            input: SynthesisInput { prompt },
            parameters: SynthesisParameters {
                size: format!("{}*{}", width, height),
                n: 1,
                seed: rand::random(),
                steps: DASHSCOPE_STEPS,
            },
        };

        let response = self
            .http
            .post(&endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("X-DashScope-Async", "enable")
            .json(&request)
            .timeout(SUBMIT_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport_error(&endpoint, e))?;

        let response = check_status(&endpoint, response).await?;

        let body: SynthesisResponse = response.json().await.map_err(|e| {
            Error::provider(&endpoint, 200, format!("failed to parse response: {}", e))
        })?;

        body.output
            .and_then(|output| output.task_id)
            .ok_or_else(|| Error::provider(&endpoint, 200, "no task id in submission response"))
    }

    /// Poll a task until it reaches a terminal state, returning the URL of
    /// the first result.
    async fn poll_task(&self, task_id: &str) -> Result<String, Error> {
        let endpoint = format!("{}/api/v1/tasks/{}", self.base_url, task_id);

        for attempt in 1..=POLL_MAX_ATTEMPTS {
            let response = self
                .http
                .get(&endpoint)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .timeout(STATUS_TIMEOUT)
                .send()
                .await
                .map_err(|e| transport_error(&endpoint, e))?;

            let response = check_status(&endpoint, response).await?;

            let body: TaskStatusResponse = response.json().await.map_err(|e| {
                Error::provider(&endpoint, 200, format!("failed to parse task status: {}", e))
            })?;

            let output = body.output.ok_or_else(|| {
                Error::provider(&endpoint, 200, "task status response missing output")
            })?;

            let status = output.task_status.unwrap_or_default();
            match status.as_str() {
                "SUCCEEDED" => {
                    let url = output
                        .results
                        .into_iter()
                        .filter_map(|result| result.url)
                        .next()
                        .ok_or_else(|| {
                            Error::provider(&endpoint, 200, "task succeeded but returned no results")
                        })?;
                    info!(task_id = %task_id, attempt, "Generation task completed");
                    return Ok(url);
                }
                "FAILED" => {
                    let message = output
                        .message
                        .or(output.code)
                        .unwrap_or_else(|| "task failed without a message".to_string());
                    return Err(Error::provider(&endpoint, 200, message));
                }
                "PENDING" | "RUNNING" => {
                    debug!(task_id = %task_id, attempt, status = %status, "Generation task still in progress");
                    tokio::time::sleep(self.poll_interval).await;
                }
                other => {
                    return Err(Error::provider(
                        &endpoint,
                        200,
                        format!("unknown task status '{}'", other),
                    ));
                }
            }
        }

        Err(Error::timeout(format!(
            "generation timed out after {} status checks",
            POLL_MAX_ATTEMPTS
        )))
    }
}

#[async_trait]
impl ProviderClient for DashScopeClient {
    fn name(&self) -> &'static str {
        "dashscope"
    }

    async fn submit_and_await(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<ImageAsset, Error> {
        let task_id = self.submit_task(prompt, width, height).await?;
        debug!(task_id = %task_id, "Generation task accepted");

        let url = self.poll_task(&task_id).await?;
        Ok(ImageAsset::Remote(url))
    }
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    model: &'a str,
    input: SynthesisInput<'a>,
    parameters: SynthesisParameters,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct SynthesisParameters {
    size: String,
    n: u32,
    seed: u32,
    steps: u32,
}

#[derive(Debug, Deserialize)]
struct SynthesisResponse {
    output: Option<TaskHandle>,
}

#[derive(Debug, Deserialize)]
struct TaskHandle {
    task_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskStatusResponse {
    output: Option<TaskOutput>,
}

#[derive(Debug, Deserialize)]
struct TaskOutput {
    task_status: Option<String>,
    #[serde(default)]
    results: Vec<TaskResult>,
    message: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskResult {
    url: Option<String>,
}
