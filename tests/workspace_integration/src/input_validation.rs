//! Input parameter validation tests.
//!
//! For any tool invocation with invalid parameters, the handler must reject
//! the request with validation details before any network traffic happens.

#[cfg(test)]
mod tests {
    use aipic_mcp_image::ImageGenerateParams;
    use proptest::prelude::*;

    fn base_params(prompt: &str) -> ImageGenerateParams {
        ImageGenerateParams {
            prompt: prompt.to_string(),
            width: 1024,
            height: 1024,
            output_path: None,
            api_key: None,
        }
    }

    /// Empty prompt is rejected with a prompt-field error.
    #[test]
    fn test_empty_prompt_rejected() {
        let result = base_params("").validate();
        assert!(result.is_err(), "Should reject empty prompt");

        let errors = result.unwrap_err();
        assert!(
            errors.iter().any(|e| e.field == "prompt"),
            "Should have a prompt validation error"
        );
    }

    /// Zero width is rejected with a width-field error.
    #[test]
    fn test_zero_width_rejected() {
        let mut params = base_params("A cat");
        params.width = 0;

        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "width"));
    }

    /// All errors are collected in one pass.
    #[test]
    fn test_multiple_errors_collected() {
        let mut params = base_params("   ");
        params.width = 0;
        params.height = 0;

        let errors = params.validate().unwrap_err();
        assert_eq!(errors.len(), 3, "prompt, width and height should all be reported");
    }

    /// Defaults deserialized from minimal JSON are valid.
    #[test]
    fn test_minimal_json_is_valid() {
        let params: ImageGenerateParams =
            serde_json::from_str(r#"{"prompt": "A cat"}"#).expect("minimal JSON parses");
        assert!(params.validate().is_ok());
    }

    proptest! {
        /// Whitespace-only prompts always fail, whatever the dimensions.
        #[test]
        fn whitespace_prompts_always_fail(
            blank in "[ \\t]{0,12}",
            width in 1u32..2048,
            height in 1u32..2048,
        ) {
            let mut params = base_params(&blank);
            params.width = width;
            params.height = height;
            prop_assert!(params.validate().is_err());
        }
    }
}
