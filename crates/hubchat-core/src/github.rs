//! GitHub MCP server session.
//!
//! Runs the official GitHub MCP server in a container and exposes it as a
//! `ToolProvider`. One value of `GithubServer` is one live session: the
//! subprocess is spawned and the handshake completed in `open`, and the
//! process is released by `close` (or by the transport's kill-on-drop
//! backstop if the session unwinds early).

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use hubchat_mcp::McpTool;
use hubchat_mcp::client::{ClientInfo, McpClient, McpError};
use hubchat_mcp::transport::StdioTransport;

use crate::config::Config;
use crate::error::Result;
use crate::outcome::ToolOutcome;
use crate::tools::ToolProvider;

/// Executable the server container runs under.
pub const SERVER_COMMAND: &str = "docker";

/// Environment variable the server reads its token from.
const TOKEN_ENV: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";

/// Container image of the official GitHub MCP server.
const SERVER_IMAGE: &str = "ghcr.io/github/github-mcp-server";

fn server_args() -> Vec<String> {
    [
        "run",
        "-i",
        "--rm",
        "-e",
        TOKEN_ENV,
        "-e",
        "GITHUB_DYNAMIC_TOOLSETS=1",
        SERVER_IMAGE,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// One live connection to the GitHub MCP server.
pub struct GithubServer {
    client: McpClient<StdioTransport>,
}

impl GithubServer {
    /// Spawn the server and complete the initialization handshake.
    pub async fn open(config: &Config) -> Result<Self> {
        let mut env = HashMap::new();
        env.insert(TOKEN_ENV.to_string(), config.github_token.clone());

        let transport = StdioTransport::spawn(SERVER_COMMAND, &server_args(), &env)
            .map_err(|e| McpError::Unavailable(format!("failed to start {SERVER_COMMAND}: {e}")))?;

        let client = McpClient::new(transport);
        let server = client
            .initialize(ClientInfo {
                name: "hubchat".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            })
            .await?;

        info!(
            server = %server.name,
            version = %server.version,
            "GitHub MCP server ready"
        );

        Ok(Self { client })
    }

    /// Tear the session down, releasing the subprocess and transport.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

#[async_trait]
impl ToolProvider for GithubServer {
    async fn list_tools(&self) -> Result<Vec<McpTool>> {
        Ok(self.client.list_tools().await?)
    }

    async fn execute(&self, name: &str, arguments: Value) -> Result<ToolOutcome> {
        debug!(tool = name, "dispatching tool call");
        match self.client.call_tool(name, arguments).await {
            Ok(result) => Ok(ToolOutcome::from_result(name, result)),
            // The server rejected the call itself (unknown tool, invalid
            // parameters). Recoverable: the model sees a tool failure.
            Err(McpError::Server(detail)) => {
                Ok(ToolOutcome::Failure(format!("Tool '{name}' failed: {detail}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}
