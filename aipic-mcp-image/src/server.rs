//! MCP server implementation for the aipic image server.
//!
//! Exposes one tool, `generate_web_image`, and translates orchestrator
//! results into MCP responses. Generation failures are reported as tool
//! errors (`is_error` responses), never as protocol-level faults.

use crate::handler::{GeneratedImage, ImageGenerateParams, ImageHandler, IMAGE_MIME_TYPE};
use aipic_mcp_common::config::Config;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rmcp::{
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    ErrorData as McpError, ServerHandler,
};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{info, warn};

/// Name of the single tool this server registers.
pub const TOOL_NAME: &str = "generate_web_image";

/// MCP server for web image generation.
#[derive(Clone)]
pub struct ImageServer {
    /// Orchestrator shared across tool calls.
    handler: Arc<ImageHandler>,
}

impl ImageServer {
    /// Create a new server with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            handler: Arc::new(ImageHandler::new(config)),
        }
    }

    /// Run the generation tool and shape the outcome into an MCP result.
    pub async fn generate_web_image(&self, params: ImageGenerateParams) -> CallToolResult {
        info!(prompt = %params.prompt, width = params.width, height = params.height, "Generating image");

        match self.handler.generate_image(params).await {
            Ok(image) => success_result(image),
            Err(e) => {
                warn!(error = %e, "Image generation failed");
                CallToolResult::error(vec![Content::text(format!("Error generating image: {}", e))])
            }
        }
    }
}

fn success_result(image: GeneratedImage) -> CallToolResult {
    let summary = image.summary();
    let encoded = BASE64.encode(&image.bytes);
    CallToolResult::success(vec![
        Content::text(summary),
        Content::image(encoded, IMAGE_MIME_TYPE.to_string()),
    ])
}

impl ServerHandler for ImageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Image generation server for web assets. \
                 Use generate_web_image to create an image from an English text prompt; \
                 the image is saved locally and returned as base64 JPEG data."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<rmcp::model::ListToolsResult, McpError>> + Send + '_
    {
        async move {
            use rmcp::model::{ListToolsResult, Tool};
            use schemars::schema_for;

            let schema = schema_for!(ImageGenerateParams);
            let schema_value = serde_json::to_value(&schema).unwrap_or_default();
            let input_schema = match schema_value {
                serde_json::Value::Object(map) => Arc::new(map),
                _ => Arc::new(serde_json::Map::new()),
            };

            Ok(ListToolsResult {
                tools: vec![Tool {
                    name: Cow::Borrowed(TOOL_NAME),
                    description: Some(Cow::Borrowed(
                        "Generate AI images for web design from an English text prompt. \
                         Useful for placeholder images, hero images, product images, and \
                         other web assets. Returns a summary plus the image as base64 JPEG.",
                    )),
                    input_schema,
                    annotations: None,
                    icons: None,
                    meta: None,
                    output_schema: None,
                    title: None,
                }],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            match params.name.as_ref() {
                TOOL_NAME => {
                    let tool_params: ImageGenerateParams = params
                        .arguments
                        .map(|args| serde_json::from_value(serde_json::Value::Object(args)))
                        .transpose()
                        .map_err(|e| {
                            McpError::invalid_params(format!("Invalid parameters: {}", e), None)
                        })?
                        .ok_or_else(|| McpError::invalid_params("Missing parameters", None))?;

                    Ok(self.generate_web_image(tool_params).await)
                }
                _ => Err(McpError::invalid_params(
                    format!("Unknown tool: {}", params.name),
                    None,
                )),
            }
        }
    }
}
