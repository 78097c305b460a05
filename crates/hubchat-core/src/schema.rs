//! Conversion between MCP tool descriptors and the LLM vendor's
//! function-calling shapes.
//!
//! Both directions are pure. The descriptor-to-schema mapping performs no
//! validation; an invalid input schema is only detected when the vendor
//! rejects the request carrying it.

use genai::chat::{Tool, ToolCall};
use serde_json::Value;

use hubchat_mcp::McpTool;

use crate::transcript::ToolCallRequest;

/// Error decoding the arguments of a model-emitted tool call.
///
/// Never fatal: the loop feeds it back to the model as a tool failure so
/// the model can correct itself on the next turn.
#[derive(Debug, thiserror::Error)]
#[error("malformed arguments for tool '{name}': {detail}")]
pub struct ArgumentDecodeError {
    pub name: String,
    pub detail: String,
}

/// Map one tool descriptor into the vendor's function-call declaration.
pub fn call_schema(tool: &McpTool) -> Tool {
    Tool::new(tool.name.clone())
        .with_description(tool.description.clone())
        .with_schema(tool.input_schema.clone())
}

/// Capture a vendor tool call as emitted, arguments still raw.
pub fn tool_call_request(call: &ToolCall) -> ToolCallRequest {
    ToolCallRequest {
        id: call.call_id.clone(),
        name: call.fn_name.clone(),
        arguments: call.fn_arguments.clone(),
    }
}

/// Decode raw tool-call arguments into an argument mapping.
///
/// Vendors disagree on the payload shape: some emit a JSON object directly,
/// others a string containing serialized JSON. Both are accepted; `null`
/// becomes the empty object.
pub fn decode_arguments(name: &str, raw: &Value) -> Result<Value, ArgumentDecodeError> {
    match raw {
        Value::Object(_) => Ok(raw.clone()),
        Value::Null => Ok(Value::Object(serde_json::Map::new())),
        Value::String(serialized) => {
            let parsed: Value =
                serde_json::from_str(serialized).map_err(|e| ArgumentDecodeError {
                    name: name.to_string(),
                    detail: e.to_string(),
                })?;
            match parsed {
                Value::Object(_) => Ok(parsed),
                other => Err(ArgumentDecodeError {
                    name: name.to_string(),
                    detail: format!("expected a JSON object, got {other}"),
                }),
            }
        }
        other => Err(ArgumentDecodeError {
            name: name.to_string(),
            detail: format!("expected a JSON object, got {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn object_arguments_pass_through() {
        let raw = json!({ "repo": "X", "state": "open" });

        let decoded = decode_arguments("list_issues", &raw).unwrap();

        assert_eq!(decoded, raw);
    }

    #[test]
    fn null_arguments_become_empty_object() {
        let decoded = decode_arguments("list_issues", &Value::Null).unwrap();

        assert_eq!(decoded, json!({}));
    }

    #[test]
    fn serialized_string_arguments_are_parsed() {
        let raw = Value::String(r#"{"repo":"X"}"#.to_string());

        let decoded = decode_arguments("list_issues", &raw).unwrap();

        assert_eq!(decoded, json!({ "repo": "X" }));
    }

    #[test]
    fn malformed_string_arguments_fail_to_decode() {
        let raw = Value::String("{not json".to_string());

        let err = decode_arguments("list_issues", &raw).unwrap_err();

        assert_eq!(err.name, "list_issues");
    }

    #[test]
    fn non_object_arguments_fail_to_decode() {
        let err = decode_arguments("list_issues", &json!([1, 2, 3])).unwrap_err();

        assert!(err.detail.contains("expected a JSON object"));
    }

    #[test]
    fn vendor_call_maps_to_request() {
        let call = ToolCall {
            call_id: "call-1".to_string(),
            fn_name: "list_issues".to_string(),
            fn_arguments: json!({ "repo": "X" }),
            thought_signatures: None,
        };

        let request = tool_call_request(&call);

        assert_eq!(request.id, "call-1");
        assert_eq!(request.name, "list_issues");
        assert_eq!(request.arguments, json!({ "repo": "X" }));
    }
}
