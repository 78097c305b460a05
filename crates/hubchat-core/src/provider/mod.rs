//! LLM provider abstraction.
//!
//! One trait, one production implementation backed by the genai framework.
//! The trait exists so the orchestration loop can be exercised against
//! scripted providers in tests.

mod genai_provider;

pub use genai_provider::GenAIProvider;

use async_trait::async_trait;
use genai::chat::ToolCall;

use hubchat_mcp::McpTool;

use crate::error::Result;
use crate::transcript::Transcript;

/// One completed assistant turn: optional text plus requested tool calls.
#[derive(Debug, Clone, Default)]
pub struct CompletionResult {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl CompletionResult {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub fn has_content(&self) -> bool {
        self.content.as_ref().map(|c| !c.is_empty()).unwrap_or(false)
    }
}

/// Trait for LLM chat providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model identifier requests are issued against.
    fn model(&self) -> &str;

    /// Send the full transcript and the tool schema set, and get back one
    /// completed assistant turn.
    async fn chat(&self, transcript: &Transcript, tools: &[McpTool]) -> Result<CompletionResult>;
}

#[async_trait]
impl<L: LlmProvider + ?Sized> LlmProvider for &L {
    fn model(&self) -> &str {
        (**self).model()
    }

    async fn chat(&self, transcript: &Transcript, tools: &[McpTool]) -> Result<CompletionResult> {
        (**self).chat(transcript, tools).await
    }
}
