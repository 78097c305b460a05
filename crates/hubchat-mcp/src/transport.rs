//! MCP Transport layer implementations

use std::collections::HashMap;
use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tracing::debug;

/// Transport trait for MCP communication
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, message: Value) -> io::Result<()>;
    async fn receive(&mut self) -> io::Result<Option<Value>>;
    async fn close(&mut self) -> io::Result<()>;
}

/// Stdio transport for subprocess communication.
///
/// Messages are newline-delimited JSON on the child's stdin/stdout. The
/// child's stderr is inherited so server diagnostics stay visible. The child
/// is killed when the transport is dropped, so the subprocess is released
/// even when a session unwinds without an explicit close.
pub struct StdioTransport {
    child: Child,
    reader: BufReader<ChildStdout>,
}

impl StdioTransport {
    /// Spawn the backing process and wire up its stdio.
    pub fn spawn(
        command: &str,
        args: &[String],
        env: &HashMap<String, String>,
    ) -> io::Result<Self> {
        let mut child = Command::new(command)
            .args(args)
            .envs(env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "failed to capture stdout"))?;

        debug!(command, "spawned MCP server process");

        Ok(Self {
            child,
            reader: BufReader::new(stdout),
        })
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn send(&mut self, message: Value) -> io::Result<()> {
        let stdin = self
            .child
            .stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "stdin not available"))?;

        let json = serde_json::to_string(&message)?;
        stdin.write_all(json.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;

        Ok(())
    }

    async fn receive(&mut self) -> io::Result<Option<Value>> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;

        if n == 0 {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&line)?;
        Ok(Some(value))
    }

    async fn close(&mut self) -> io::Result<()> {
        self.child.kill().await?;
        Ok(())
    }
}
