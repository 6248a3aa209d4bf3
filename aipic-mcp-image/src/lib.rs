//! Aipic MCP Image Server Library
//!
//! Text-to-image generation over MCP: one `generate_web_image` tool backed by
//! the ModelScope (synchronous) and DashScope (task-polling) APIs.

pub mod credential;
pub mod handler;
pub mod imaging;
pub mod provider;
pub mod server;

pub use handler::{GeneratedImage, ImageGenerateParams, ImageHandler};
pub use provider::{ImageAsset, ProviderClient};
pub use server::ImageServer;
