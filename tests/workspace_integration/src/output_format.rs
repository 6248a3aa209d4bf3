//! Output format tests.
//!
//! For any successful tool execution, the result is MCP content: a text
//! summary followed by base64 image data with an image MIME type. Failures
//! are `is_error` results, never protocol faults.

use rmcp::model::{CallToolResult, Content, RawContent};

/// Validates that a CallToolResult has valid content format.
fn validate_tool_result(result: &CallToolResult) -> Result<(), String> {
    if result.content.is_empty() && !result.is_error.unwrap_or(false) {
        return Err("Successful result should have content".to_string());
    }

    for content in &result.content {
        validate_content(content)?;
    }

    Ok(())
}

/// Validates that a Content item has valid structure.
fn validate_content(content: &Content) -> Result<(), String> {
    match &content.raw {
        RawContent::Text(text_content) => {
            if text_content.text.is_empty() {
                return Err("Text content should not be empty".to_string());
            }
            Ok(())
        }
        RawContent::Image(image_content) => {
            if image_content.data.is_empty() {
                return Err("Image content should have data".to_string());
            }
            if !image_content.mime_type.starts_with("image/") {
                return Err(format!(
                    "Image content should have image/* mime type, got: {}",
                    image_content.mime_type
                ));
            }
            Ok(())
        }
        other => Err(format!("Unexpected content kind: {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aipic_mcp_image::handler::GeneratedImage;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use std::path::PathBuf;

    fn sample_image() -> GeneratedImage {
        GeneratedImage {
            path: PathBuf::from("/tmp/web_image_deadbeef.jpg"),
            width: 640,
            height: 480,
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
            prompt: "A modern office workspace".to_string(),
        }
    }

    #[test]
    fn summary_contains_prompt_dimensions_and_path() {
        let summary = sample_image().summary();
        assert!(summary.contains("A modern office workspace"));
        assert!(summary.contains("640x480"));
        assert!(summary.contains("web_image_deadbeef.jpg"));
    }

    #[test]
    fn success_shape_passes_format_validation() {
        let image = sample_image();
        let result = CallToolResult::success(vec![
            Content::text(image.summary()),
            Content::image(BASE64.encode(&image.bytes), "image/jpeg".to_string()),
        ]);

        assert!(validate_tool_result(&result).is_ok());
        assert_ne!(result.is_error, Some(true));
    }

    #[test]
    fn error_shape_is_flagged_not_faulted() {
        let result =
            CallToolResult::error(vec![Content::text("Error generating image: Timed out")]);

        assert_eq!(result.is_error, Some(true));
        assert!(validate_tool_result(&result).is_ok());
    }

    #[test]
    fn image_mime_type_is_validated() {
        let bad = CallToolResult::success(vec![Content::image(
            "aGVsbG8=".to_string(),
            "application/octet-stream".to_string(),
        )]);
        assert!(validate_tool_result(&bad).is_err());
    }
}
