//! Chat session: the tool-calling orchestration loop.
//!
//! One `run_turn` per line of user input. The loop sends the full
//! transcript to the model, dispatches every tool call the model requests,
//! appends the normalized results, and requeries until the model answers in
//! plain text. Tool-level failures are data: they go into the transcript
//! for the model to react to, and never abort the turn.

use serde_json::Value;
use tracing::{info, warn};

use hubchat_mcp::McpTool;

use crate::error::Result;
use crate::outcome::ToolOutcome;
use crate::provider::LlmProvider;
use crate::schema::{decode_arguments, tool_call_request};
use crate::tools::ToolProvider;
use crate::transcript::{ToolCallRequest, Transcript};

/// System prompt for the GitHub assistant.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant with access to GitHub tools. \
     Decide whether a user request needs a tool call; if not, answer directly.";

/// Observer for user-visible session events.
pub trait SessionObserver {
    /// A tool call is about to be dispatched.
    fn tool_started(&mut self, _name: &str, _arguments: &Value) {}
    /// A dispatched tool call finished.
    fn tool_finished(&mut self, _name: &str, _success: bool) {}
}

/// Observer that drops every event.
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// One conversation against one model and one tool provider.
pub struct ChatSession<L, P> {
    provider: L,
    tools: P,
    descriptors: Vec<McpTool>,
    transcript: Transcript,
}

impl<L: LlmProvider, P: ToolProvider> ChatSession<L, P> {
    /// Create a session, enumerating the provider's tools once.
    pub async fn new(provider: L, tools: P) -> Result<Self> {
        let descriptors = tools.list_tools().await?;
        info!(count = descriptors.len(), "tools discovered");

        Ok(Self {
            provider,
            tools,
            descriptors,
            transcript: Transcript::new(SYSTEM_PROMPT),
        })
    }

    /// Tool descriptors, in the provider's enumeration order.
    pub fn tools(&self) -> &[McpTool] {
        &self.descriptors
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Run one user turn to completion.
    ///
    /// Returns the assistant's final text. Empty or whitespace-only input
    /// returns `None` without touching the transcript or the model; so does
    /// an assistant turn with neither text nor tool calls.
    pub async fn run_turn(
        &mut self,
        input: &str,
        observer: &mut dyn SessionObserver,
    ) -> Result<Option<String>> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        self.transcript.push_user(input);

        loop {
            let response = self
                .provider
                .chat(&self.transcript, &self.descriptors)
                .await?;

            let requests: Vec<ToolCallRequest> =
                response.tool_calls.iter().map(tool_call_request).collect();

            // The assistant entry goes in before any dispatch; the vendor
            // requires tool results to follow the requesting message.
            self.transcript
                .push_assistant(response.content.clone(), requests.clone());

            if requests.is_empty() {
                let answer = response
                    .content
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty());
                return Ok(answer);
            }

            for request in &requests {
                let outcome = self.dispatch(request, observer).await?;
                self.transcript
                    .push_tool_result(&request.id, outcome.into_transcript_text());
            }
        }
    }

    /// Dispatch one tool call, absorbing recoverable failures.
    async fn dispatch(
        &self,
        request: &ToolCallRequest,
        observer: &mut dyn SessionObserver,
    ) -> Result<ToolOutcome> {
        observer.tool_started(&request.name, &request.arguments);

        let arguments = match decode_arguments(&request.name, &request.arguments) {
            Ok(arguments) => arguments,
            Err(e) => {
                warn!(tool = %request.name, "tool call arguments failed to decode: {e}");
                observer.tool_finished(&request.name, false);
                return Ok(ToolOutcome::Failure(e.to_string()));
            }
        };

        let outcome = self.tools.execute(&request.name, arguments).await?;
        if !outcome.is_success() {
            warn!(tool = %request.name, "tool reported failure");
        }
        observer.tool_finished(&request.name, outcome.is_success());
        Ok(outcome)
    }
}
