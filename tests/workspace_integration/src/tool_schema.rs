//! Tool schema validity tests.
//!
//! The `generate_web_image` input schema must be a valid JSON Schema object
//! exposing the five wire fields, with `prompt` as the only required one.

use serde_json::Value;

/// Validates that a JSON schema has the required structure.
fn validate_json_schema(schema: &Value) -> Result<(), String> {
    let obj = schema
        .as_object()
        .ok_or_else(|| "Schema must be an object".to_string())?;

    if let Some(type_val) = obj.get("type") {
        if type_val != "object" {
            return Err(format!("Expected type 'object', got {:?}", type_val));
        }
    }

    if let Some(properties) = obj.get("properties") {
        if !properties.is_object() {
            return Err("Properties must be an object".to_string());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aipic_mcp_image::ImageGenerateParams;
    use schemars::schema_for;

    fn params_schema() -> Value {
        serde_json::to_value(schema_for!(ImageGenerateParams)).expect("schema serializes")
    }

    #[test]
    fn test_json_schema_validation() {
        let valid_schema = serde_json::json!({
            "type": "object",
            "properties": {
                "prompt": {"type": "string"}
            },
            "required": ["prompt"]
        });
        assert!(validate_json_schema(&valid_schema).is_ok());

        let invalid_schema = serde_json::json!({"type": "string"});
        assert!(validate_json_schema(&invalid_schema).is_err());
    }

    #[test]
    fn generate_web_image_schema_is_an_object_schema() {
        let schema = params_schema();
        assert!(validate_json_schema(&schema).is_ok(), "schema: {}", schema);
    }

    #[test]
    fn schema_exposes_wire_field_names() {
        let schema = params_schema();
        let properties = schema["properties"].as_object().expect("properties object");

        for field in ["prompt", "width", "height", "outputPath", "apiKey"] {
            assert!(
                properties.contains_key(field),
                "Schema should expose field '{}', got: {:?}",
                field,
                properties.keys().collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn only_prompt_is_required() {
        let schema = params_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        assert_eq!(required, vec!["prompt"]);
    }
}
