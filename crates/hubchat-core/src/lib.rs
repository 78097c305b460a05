//! Hubchat Core - tool-calling orchestration for the GitHub chat agent
//!
//! This crate provides the core functionality for hubchat:
//! - Conversation transcript and its ordering invariants
//! - Schema adaptation between MCP tools and the LLM's function calls
//! - Tool outcome normalization
//! - The GitHub MCP server session
//! - The chat session loop driving model queries and tool dispatch

pub mod config;
pub mod error;
pub mod github;
pub mod outcome;
pub mod provider;
pub mod schema;
pub mod session;
pub mod tools;
pub mod transcript;

pub use config::Config;
pub use error::{Error, Result};
pub use github::GithubServer;
pub use outcome::{ToolOutcome, ToolPayload};
pub use provider::{CompletionResult, GenAIProvider, LlmProvider};
pub use session::{ChatSession, NullObserver, SYSTEM_PROMPT, SessionObserver};
pub use tools::ToolProvider;
pub use transcript::{Entry, ToolCallRequest, Transcript};
