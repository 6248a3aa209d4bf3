//! Aipic MCP Common Library
//!
//! Shared utilities for configuration, error handling, tracing, and MCP
//! server/transport plumbing used by the aipic image generation server.

pub mod config;
pub mod error;
pub mod server;
pub mod tracing;
pub mod transport;

#[cfg(test)]
mod transport_test;

pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
