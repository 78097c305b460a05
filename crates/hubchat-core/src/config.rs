//! Environment-driven configuration.
//!
//! All credentials come from the environment; nothing is read from disk.
//! Validation happens once, before any conversation starts, so a missing
//! credential or executable is reported as a single diagnostic instead of a
//! mid-session failure.

use crate::error::{Error, Result};
use crate::github;

/// Configuration for one chat run.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the LLM endpoint.
    pub api_key: String,
    /// Optional base URL override for the LLM endpoint.
    pub base_url: Option<String>,
    /// Token forwarded to the GitHub MCP server.
    pub github_token: String,
    /// Model identifier requests are issued against.
    pub model: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            Error::Config("missing OPENAI_API_KEY environment variable".to_string())
        })?;

        let github_token = std::env::var("GITHUB_PERSONAL_ACCESS_TOKEN").map_err(|_| {
            Error::Config("missing GITHUB_PERSONAL_ACCESS_TOKEN environment variable".to_string())
        })?;

        if which::which(github::SERVER_COMMAND).is_err() {
            return Err(Error::Config(format!(
                "{} not found on PATH; it is required to run the GitHub MCP server",
                github::SERVER_COMMAND
            )));
        }

        Ok(Self {
            api_key,
            base_url: std::env::var("OPENAI_BASE_URL").ok(),
            github_token,
            model: model.into(),
        })
    }
}
