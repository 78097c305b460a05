//! Tool provider abstraction.

use async_trait::async_trait;
use serde_json::Value;

use hubchat_mcp::McpTool;

use crate::error::Result;
use crate::outcome::ToolOutcome;

/// A capability source: enumerates tools and executes them by name.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Enumerate available tools. The returned order is the canonical order
    /// in which schemas are exposed to the model.
    async fn list_tools(&self) -> Result<Vec<McpTool>>;

    /// Execute a named tool.
    ///
    /// Tool-level failures (the server flags the result as an error, or
    /// rejects the call outright) come back as `ToolOutcome::Failure`; only
    /// transport and protocol breakage is `Err`.
    async fn execute(&self, name: &str, arguments: Value) -> Result<ToolOutcome>;
}

#[async_trait]
impl<P: ToolProvider + ?Sized> ToolProvider for &P {
    async fn list_tools(&self) -> Result<Vec<McpTool>> {
        (**self).list_tools().await
    }

    async fn execute(&self, name: &str, arguments: Value) -> Result<ToolOutcome> {
        (**self).execute(name, arguments).await
    }
}
