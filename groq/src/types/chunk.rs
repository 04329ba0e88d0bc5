//! Streaming chat completion chunks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::Role;
use super::response::GroqMetadata;
use super::tool::ToolCallDelta;

/// One decoded event of a streaming chat completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatCompletionChunk {
    /// Completion identifier, shared by every chunk of the stream.
    pub id: String,
    /// Object type (always `"chat.completion.chunk"`).
    pub object: String,
    /// Unix timestamp of creation.
    pub created: i64,
    /// The model producing the completion.
    pub model: String,
    /// Per-choice deltas carried by this chunk.
    pub choices: Vec<ChunkChoice>,
    /// Backend configuration fingerprint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,
    /// Groq-specific metadata; the last chunk carries usage here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_groq: Option<GroqMetadata>,
}

impl ChatCompletionChunk {
    /// Content fragment of the first choice, if any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.as_ref())
            .and_then(|d| d.content.as_deref())
    }

    /// Finish reason of the first choice, present only on its terminal delta.
    #[must_use]
    pub fn finish_reason(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.finish_reason.as_deref())
    }
}

/// Delta for a single choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkChoice {
    /// Position among parallel choices, stable across the completion.
    pub index: u32,
    /// The message fragment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<MessageDelta>,
    /// Set only on the terminal delta for this choice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// Log probabilities, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<Value>,
}

/// Partial message content.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MessageDelta {
    /// Author role, usually only on the first chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Next piece of the text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool call fragments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}
