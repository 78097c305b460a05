//! GenAI-based LLM provider implementation.
//!
//! Requests go through genai's streaming API and are drained to completion
//! before anything is returned — long tool-heavy turns trip the plain
//! request timeout otherwise. Callers only ever see one completed assistant
//! turn.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use genai::chat::{ChatMessage, ChatRequest, ChatStreamEvent, ToolCall, ToolResponse};
use genai::resolver::{AuthData, AuthResolver};
use genai::{Client, WebConfig};
use tracing::{debug, error};

use hubchat_mcp::McpTool;

use crate::error::{Error, Result};
use crate::provider::{CompletionResult, LlmProvider};
use crate::schema::call_schema;
use crate::transcript::{Entry, Transcript};

/// A provider implementation using genai.
pub struct GenAIProvider {
    client: Client,
    model: String,
}

impl GenAIProvider {
    /// Timeout for LLM API requests (5 minutes)
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

    fn web_config() -> WebConfig {
        WebConfig::default()
            .with_timeout(Self::REQUEST_TIMEOUT)
            .with_connect_timeout(Duration::from_secs(30))
    }

    /// Create a provider that authenticates every request with `api_key`.
    ///
    /// genai resolves the upstream service from the model name. A custom
    /// base URL is carried by the configuration layer, but endpoint
    /// overrides are limited to what genai supports per provider.
    pub fn new(model: impl Into<String>, api_key: &str) -> Self {
        let api_key = api_key.to_string();
        let auth_resolver = AuthResolver::from_resolver_fn(
            move |_model_iden| -> std::result::Result<Option<AuthData>, genai::resolver::Error> {
                Ok(Some(AuthData::from_single(api_key.clone())))
            },
        );

        let client = Client::builder()
            .with_web_config(Self::web_config())
            .with_auth_resolver(auth_resolver)
            .build();

        Self {
            client,
            model: model.into(),
        }
    }

    /// Convert the transcript and tool set into a genai request.
    fn build_request(&self, transcript: &Transcript, tools: &[McpTool]) -> ChatRequest {
        let mut chat_req = ChatRequest::default();

        for entry in transcript.entries() {
            chat_req = match entry {
                Entry::System { content } => chat_req.with_system(content.as_str()),
                Entry::User { content } => chat_req.append_message(ChatMessage::user(content)),
                Entry::Assistant {
                    content,
                    tool_calls,
                } => {
                    if tool_calls.is_empty() {
                        match content {
                            Some(text) => chat_req.append_message(ChatMessage::assistant(text)),
                            None => chat_req,
                        }
                    } else {
                        // Tool calls must land in a single assistant message
                        // for the OpenAI-style wire format; any text in that
                        // turn rides along inside the vendor message.
                        let calls: Vec<ToolCall> = tool_calls
                            .iter()
                            .map(|call| ToolCall {
                                call_id: call.id.clone(),
                                fn_name: call.name.clone(),
                                fn_arguments: call.arguments.clone(),
                                thought_signatures: None,
                            })
                            .collect();
                        chat_req.append_message(calls)
                    }
                }
                Entry::Tool { call_id, content } => {
                    chat_req.append_message(ToolResponse::new(call_id.clone(), content.clone()))
                }
            };
        }

        if !tools.is_empty() {
            chat_req = chat_req.with_tools(tools.iter().map(call_schema).collect::<Vec<_>>());
        }

        chat_req
    }
}

#[async_trait]
impl LlmProvider for GenAIProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, transcript: &Transcript, tools: &[McpTool]) -> Result<CompletionResult> {
        let chat_req = self.build_request(transcript, tools);

        debug!(
            model = %self.model,
            entries = transcript.len(),
            tools = tools.len(),
            "sending chat request"
        );

        let stream_res = self
            .client
            .exec_chat_stream(&self.model, chat_req, None)
            .await
            .map_err(|e| {
                error!(error = ?e, model = %self.model, "LLM request failed");
                Error::Provider(format!("{e:?}"))
            })?;

        let mut content = String::new();
        let mut tool_calls: Vec<ToolCall> = Vec::new();
        let mut stream = stream_res.stream;

        while let Some(event) = stream.next().await {
            match event {
                Ok(ChatStreamEvent::Chunk(chunk)) => content.push_str(&chunk.content),
                Ok(ChatStreamEvent::ToolCallChunk(tc)) => tool_calls.push(tc.tool_call),
                Ok(ChatStreamEvent::End(_)) => break,
                // Reasoning and thought-signature events are not part of the
                // answer surface.
                Ok(_) => {}
                Err(e) => {
                    error!(error = ?e, model = %self.model, "LLM stream error");
                    return Err(Error::Provider(format!("{e:?}")));
                }
            }
        }

        Ok(CompletionResult {
            content: if content.is_empty() {
                None
            } else {
                Some(content)
            },
            tool_calls,
        })
    }
}
