//! Aipic MCP Image Server
//!
//! MCP server exposing text-to-image generation backed by ModelScope and
//! DashScope.

use aipic_mcp_common::{Config, McpServerBuilder, TransportArgs};
use aipic_mcp_image::ImageServer;
use anyhow::Result;
use clap::Parser;

/// Command-line arguments for the image server.
#[derive(Parser, Debug)]
#[command(name = "aipic-mcp-image")]
#[command(about = "MCP server for AI web image generation")]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    aipic_mcp_common::tracing::init_tracing();

    tracing::info!("aipic-mcp-image server starting...");

    let args = Args::parse();

    let config = Config::from_env()?;
    tracing::info!(
        key_fallback = config.key_fallback,
        output_dir = config.output_dir.as_deref().unwrap_or("<auto>"),
        "Configuration loaded"
    );

    let server = ImageServer::new(config);

    let transport = args.transport.into_transport();
    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
