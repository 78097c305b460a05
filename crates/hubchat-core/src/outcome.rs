//! Tool execution outcomes and their canonical text form.
//!
//! A tool result from the server is heterogeneous: it can carry structured
//! data, text content blocks, other block kinds (images, resource
//! references), or an error flag. The precedence here is ordered and
//! explicit: error flag, then structured payload, then text, then the block
//! fallback.

use serde_json::{Value, json};

use hubchat_mcp::ToolCallResult;

/// Payload of a successful tool execution.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPayload {
    /// Schema-validated data, distinct from free text.
    Structured(Value),
    /// Text content blocks joined with newlines, in block order.
    Text(String),
    /// Content blocks that are neither structured nor text, each serialized
    /// to a plain mapping.
    Blocks(Vec<Value>),
}

/// Outcome of one tool execution.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(ToolPayload),
    /// Human-readable description of why the tool failed.
    Failure(String),
}

impl ToolOutcome {
    /// Normalize a raw call result from the server.
    pub fn from_result(tool_name: &str, result: ToolCallResult) -> Self {
        if result.is_error {
            let detail = result.structured_content.unwrap_or_else(|| {
                Value::Array(result.content.iter().map(|block| block.to_value()).collect())
            });
            return Self::Failure(format!("Tool '{tool_name}' failed: {detail}"));
        }

        if let Some(structured) = result.structured_content {
            return Self::Success(ToolPayload::Structured(structured));
        }

        let texts: Vec<&str> = result
            .content
            .iter()
            .filter(|block| block.is_text())
            .filter_map(|block| block.text.as_deref())
            .collect();
        if !texts.is_empty() {
            return Self::Success(ToolPayload::Text(texts.join("\n")));
        }

        Self::Success(ToolPayload::Blocks(
            result.content.iter().map(|block| block.to_value()).collect(),
        ))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Serialize the outcome to the string stored in a tool transcript
    /// entry. Every variant produces valid JSON; failures become a mapping
    /// with a single `error` key.
    pub fn into_transcript_text(self) -> String {
        match self {
            Self::Success(ToolPayload::Structured(value)) => value.to_string(),
            Self::Success(ToolPayload::Text(text)) => Value::String(text).to_string(),
            Self::Success(ToolPayload::Blocks(blocks)) => Value::Array(blocks).to_string(),
            Self::Failure(detail) => json!({ "error": detail }).to_string(),
        }
    }
}
