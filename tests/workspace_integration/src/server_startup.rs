//! Server startup integration tests.
//!
//! Tests that the MCP server can be instantiated and provides correct server
//! info and capabilities.

#[cfg(test)]
mod tests {
    use aipic_mcp_common::Config;
    use aipic_mcp_image::ImageServer;
    use rmcp::ServerHandler;

    /// The server comes up with instructions mentioning image generation.
    #[test]
    fn test_image_server_startup() {
        let server = ImageServer::new(Config::default());
        let info = server.get_info();

        let instructions = info.instructions.expect("instructions should be set");
        assert!(
            instructions.to_lowercase().contains("image"),
            "Server instructions should mention 'image'"
        );
        assert!(
            instructions.contains("generate_web_image"),
            "Server instructions should name the tool"
        );
    }

    /// Tools are advertised as a capability; nothing else is.
    #[test]
    fn test_image_server_capabilities() {
        let server = ImageServer::new(Config::default());
        let info = server.get_info();

        assert!(info.capabilities.tools.is_some(), "Tools capability should be enabled");
        assert!(info.capabilities.resources.is_none(), "No resources are exposed");
        assert!(info.capabilities.prompts.is_none(), "No prompts are exposed");
    }

    /// Startup works with a fully populated configuration too.
    #[test]
    fn test_image_server_startup_with_config() {
        let config = Config {
            output_dir: Some("/tmp/aipic-test".to_string()),
            key_fallback: true,
            port: 9000,
        };

        let server = ImageServer::new(config);
        assert!(server.get_info().instructions.is_some());
    }
}
