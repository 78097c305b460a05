//! Hubchat MCP - Model Context Protocol client
//!
//! This crate provides the wire layer for talking to an MCP server over a
//! subprocess's stdio: JSON-RPC framing, the transport abstraction, and a
//! client that performs the initialization handshake, lists tools, and
//! invokes them.

pub mod client;
pub mod protocol;
pub mod transport;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP protocol version
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Tool definition in MCP format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// One unit of a tool result's content.
///
/// Text blocks carry their payload in `text`. Other kinds (images, resource
/// references) keep whatever fields the server sent in `extra`, so the block
/// can always be round-tripped back to a plain JSON mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ContentBlock {
    /// A plain text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
            extra: serde_json::Map::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == "text"
    }

    /// Serialize the block back to a plain JSON mapping.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Result of a `tools/call` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallResult {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(
        rename = "structuredContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub structured_content: Option<Value>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}
