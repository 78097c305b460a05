//! Conversation transcript.
//!
//! The transcript is the ordered, append-only record of one conversation:
//! one system entry inserted at construction, then user, assistant, and tool
//! entries in arrival order. Order is load-bearing — the LLM vendor rejects
//! a request whose tool results do not directly follow the assistant entry
//! that requested them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool call requested by the assistant, as emitted by the vendor.
///
/// `arguments` is the raw value from the wire; it is decoded into a proper
/// argument mapping only at dispatch time (see `schema::decode_arguments`),
/// so malformed calls can still be recorded faithfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// One transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entry {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: Option<String>,
        tool_calls: Vec<ToolCallRequest>,
    },
    Tool {
        call_id: String,
        content: String,
    },
}

/// Ordered, append-only conversation history.
#[derive(Debug)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    /// Create a transcript seeded with the system entry.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            entries: vec![Entry::System {
                content: system_prompt.into(),
            }],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(Entry::User {
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: Option<String>, tool_calls: Vec<ToolCallRequest>) {
        self.entries.push(Entry::Assistant {
            content,
            tool_calls,
        });
    }

    /// Append a tool result entry.
    ///
    /// The call id must belong to the immediately preceding assistant entry
    /// and must not already have a result. A mismatch is a bug in the
    /// orchestration loop, not recoverable state.
    pub fn push_tool_result(&mut self, call_id: &str, content: impl Into<String>) {
        debug_assert!(
            self.unanswered_call_ids().iter().any(|id| *id == call_id),
            "tool result for unknown call id: {call_id}"
        );
        self.entries.push(Entry::Tool {
            call_id: call_id.to_string(),
            content: content.into(),
        });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call ids of the latest assistant entry that do not yet have a tool
    /// result appended after it.
    fn unanswered_call_ids(&self) -> Vec<&str> {
        let mut answered = Vec::new();
        for entry in self.entries.iter().rev() {
            match entry {
                Entry::Tool { call_id, .. } => answered.push(call_id.as_str()),
                Entry::Assistant { tool_calls, .. } => {
                    return tool_calls
                        .iter()
                        .map(|call| call.id.as_str())
                        .filter(|id| !answered.contains(id))
                        .collect();
                }
                _ => return Vec::new(),
            }
        }
        Vec::new()
    }
}
