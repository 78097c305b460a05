//! Error types for hubchat

use thiserror::Error;

use hubchat_mcp::client::McpError;

/// Result type alias using the hubchat Error
pub type Result<T> = std::result::Result<T, Error>;

/// Hubchat error types.
///
/// Everything here is fatal to the running conversation. Tool-level
/// failures (bad arguments, a tool the server rejects) never become an
/// `Error`; they are normalized into the transcript as data so the model
/// can recover.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("tool server error: {0}")]
    Mcp(#[from] McpError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
