//! MCP Client implementation

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use tokio::sync::Mutex;
use tracing::debug;

use crate::protocol::{JsonRpcRequest, JsonRpcResponse, RequestId, methods};
use crate::transport::Transport;
use crate::{McpTool, PROTOCOL_VERSION, ToolCallResult};

/// MCP errors.
///
/// `Server` carries a JSON-RPC error response from the server; whether that
/// is fatal depends on the request (a rejected `tools/call` is recoverable,
/// a rejected handshake is not), so the policy lives with the caller.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("MCP server unavailable: {0}")]
    Unavailable(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("server error: {0}")]
    Server(String),
}

/// MCP Client for connecting to MCP servers
pub struct McpClient<T: Transport> {
    transport: Arc<Mutex<T>>,
    request_id: AtomicI64,
}

impl<T: Transport> McpClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(Mutex::new(transport)),
            request_id: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> RequestId {
        RequestId::Number(self.request_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Initialize the connection.
    ///
    /// Sends the `initialize` request and, once the server answers, the
    /// `notifications/initialized` notification. No other call is valid
    /// before this completes.
    pub async fn initialize(&self, client_info: ClientInfo) -> Result<ServerInfo, McpError> {
        let params = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": client_info.name,
                "version": client_info.version
            }
        });

        let request = JsonRpcRequest::new(self.next_id(), methods::INITIALIZE).with_params(params);

        let response = self.send_request(request).await?;

        if let Some(result) = response.result {
            let init: InitializeResult = serde_json::from_value(result)
                .map_err(|e| McpError::Protocol(e.to_string()))?;

            // Send initialized notification
            let notification = serde_json::json!({
                "jsonrpc": "2.0",
                "method": methods::INITIALIZED
            });

            let mut transport = self.transport.lock().await;
            transport
                .send(notification)
                .await
                .map_err(|e| McpError::Transport(e.to_string()))?;

            debug!(
                server = %init.server_info.name,
                version = %init.server_info.version,
                "MCP handshake complete"
            );

            Ok(ServerInfo {
                name: init.server_info.name,
                version: init.server_info.version,
            })
        } else if let Some(error) = response.error {
            Err(McpError::Protocol(error.message))
        } else {
            Err(McpError::Protocol("empty initialize response".to_string()))
        }
    }

    /// List available tools
    pub async fn list_tools(&self) -> Result<Vec<McpTool>, McpError> {
        let request = JsonRpcRequest::new(self.next_id(), methods::TOOLS_LIST);
        let response = self.send_request(request).await?;

        if let Some(result) = response.result {
            let listing: ToolsListResult = serde_json::from_value(result)
                .map_err(|e| McpError::Protocol(e.to_string()))?;
            Ok(listing.tools)
        } else if let Some(error) = response.error {
            Err(McpError::Server(error.message))
        } else {
            Err(McpError::Protocol("empty tools/list response".to_string()))
        }
    }

    /// Call a tool.
    ///
    /// A result with `isError` set is returned as a normal `ToolCallResult`;
    /// a JSON-RPC error response becomes `McpError::Server`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolCallResult, McpError> {
        let params = serde_json::json!({
            "name": name,
            "arguments": arguments
        });

        let request = JsonRpcRequest::new(self.next_id(), methods::TOOLS_CALL).with_params(params);

        let response = self.send_request(request).await?;

        if let Some(result) = response.result {
            serde_json::from_value(result).map_err(|e| McpError::Protocol(e.to_string()))
        } else if let Some(error) = response.error {
            Err(McpError::Server(error.message))
        } else {
            Err(McpError::Protocol("empty tools/call response".to_string()))
        }
    }

    /// Close the underlying transport, releasing the server process.
    pub async fn close(&self) -> Result<(), McpError> {
        let mut transport = self.transport.lock().await;
        transport
            .close()
            .await
            .map_err(|e| McpError::Transport(e.to_string()))
    }

    async fn send_request(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse, McpError> {
        let mut transport = self.transport.lock().await;

        let request_value =
            serde_json::to_value(&request).map_err(|e| McpError::Protocol(e.to_string()))?;

        transport
            .send(request_value)
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        let response_value = transport
            .receive()
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?
            .ok_or_else(|| McpError::Transport("connection closed".to_string()))?;

        serde_json::from_value(response_value).map_err(|e| McpError::Protocol(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, serde::Deserialize)]
struct InitializeResult {
    #[serde(rename = "serverInfo")]
    server_info: ServerInfoInner,
}

#[derive(Debug, serde::Deserialize)]
struct ServerInfoInner {
    name: String,
    version: String,
}

#[derive(Debug, serde::Deserialize)]
struct ToolsListResult {
    tools: Vec<McpTool>,
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::transport::Transport;

    /// Transport that replays canned responses and records what was sent.
    struct ScriptTransport {
        sent: Vec<Value>,
        replies: VecDeque<Value>,
        closed: bool,
    }

    impl ScriptTransport {
        fn new(replies: Vec<Value>) -> Self {
            Self {
                sent: Vec::new(),
                replies: replies.into(),
                closed: false,
            }
        }
    }

    #[async_trait]
    impl Transport for ScriptTransport {
        async fn send(&mut self, message: Value) -> io::Result<()> {
            self.sent.push(message);
            Ok(())
        }

        async fn receive(&mut self) -> io::Result<Option<Value>> {
            Ok(self.replies.pop_front())
        }

        async fn close(&mut self) -> io::Result<()> {
            self.closed = true;
            Ok(())
        }
    }

    fn init_reply(id: i64) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "serverInfo": { "name": "github-mcp-server", "version": "1.0.0" }
            }
        })
    }

    #[tokio::test]
    async fn initialize_handshake_sends_notification() {
        let client = McpClient::new(ScriptTransport::new(vec![init_reply(1)]));

        let info = client
            .initialize(ClientInfo {
                name: "hubchat".to_string(),
                version: "0.1.0".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(info.name, "github-mcp-server");

        let transport = client.transport.lock().await;
        assert_eq!(transport.sent.len(), 2);
        assert_eq!(transport.sent[0]["method"], "initialize");
        assert_eq!(
            transport.sent[0]["params"]["protocolVersion"],
            PROTOCOL_VERSION
        );
        assert_eq!(transport.sent[1]["method"], "notifications/initialized");
        assert!(transport.sent[1].get("id").is_none());
    }

    #[tokio::test]
    async fn initialize_fails_on_closed_connection() {
        let client = McpClient::new(ScriptTransport::new(vec![]));

        let err = client
            .initialize(ClientInfo {
                name: "hubchat".to_string(),
                version: "0.1.0".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, McpError::Transport(_)));
    }

    #[tokio::test]
    async fn list_tools_parses_listing() {
        let reply = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "tools": [
                    { "name": "list_issues", "description": "List issues", "inputSchema": {} },
                    { "name": "create_issue", "description": "", "inputSchema": {} }
                ]
            }
        });
        let client = McpClient::new(ScriptTransport::new(vec![reply]));

        let tools = client.list_tools().await.unwrap();

        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "list_issues");
        assert_eq!(tools[1].name, "create_issue");
    }

    #[tokio::test]
    async fn list_tools_rejects_malformed_listing() {
        let reply = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "tools": "not-a-list" }
        });
        let client = McpClient::new(ScriptTransport::new(vec![reply]));

        let err = client.list_tools().await.unwrap_err();

        assert!(matches!(err, McpError::Protocol(_)));
    }

    #[tokio::test]
    async fn call_tool_returns_result_with_error_flag() {
        let reply = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "content": [{ "type": "text", "text": "repository not found" }],
                "isError": true
            }
        });
        let client = McpClient::new(ScriptTransport::new(vec![reply]));

        let result = client
            .call_tool("list_issues", json!({ "repo": "missing" }))
            .await
            .unwrap();

        assert!(result.is_error);
        assert_eq!(
            result.content[0].text.as_deref(),
            Some("repository not found")
        );
    }

    #[tokio::test]
    async fn close_shuts_down_transport() {
        let client = McpClient::new(ScriptTransport::new(vec![]));

        client.close().await.unwrap();

        assert!(client.transport.lock().await.closed);
    }

    #[tokio::test]
    async fn call_tool_surfaces_rpc_error_as_server_error() {
        let reply = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "unknown tool" }
        });
        let client = McpClient::new(ScriptTransport::new(vec![reply]));

        let err = client.call_tool("nope", json!({})).await.unwrap_err();

        assert!(matches!(err, McpError::Server(message) if message == "unknown tool"));
    }
}
