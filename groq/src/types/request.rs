//! Chat completion request.

use serde::{Deserialize, Serialize};

use super::message::ChatMessage;
use super::tool::{Tool, ToolChoice};

/// Model used when none is chosen explicitly.
pub const DEFAULT_MODEL: &str = LLAMA3_8B;

/// `llama3-8b-8192`.
pub const LLAMA3_8B: &str = "llama3-8b-8192";
/// `llama3-70b-8192`.
pub const LLAMA3_70B: &str = "llama3-70b-8192";
/// `llama-3.1-8b-instant`.
pub const LLAMA_3_1_8B_INSTANT: &str = "llama-3.1-8b-instant";
/// `llama-3.3-70b-versatile`.
pub const LLAMA_3_3_70B_VERSATILE: &str = "llama-3.3-70b-versatile";
/// `mixtral-8x7b-32768`.
pub const MIXTRAL_8X7B: &str = "mixtral-8x7b-32768";
/// `gemma2-9b-it`.
pub const GEMMA2_9B: &str = "gemma2-9b-it";

/// Request body for `POST /chat/completions`.
///
/// Unset optional fields are omitted on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// The conversation, in order.
    pub messages: Vec<ChatMessage>,
    /// The model to use.
    pub model: String,
    /// Sampling temperature between 0 and 2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum number of tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Nucleus sampling parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Whether the response is streamed.
    ///
    /// The client sets this itself: `false` for non-streaming calls when
    /// unset, always `true` for streaming calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Stop sequences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Number of completions to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    /// Penalty for tokens based on their frequency so far.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// Penalty for tokens based on whether they appeared so far.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Tools the model may call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    /// How the model should pick tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    /// Identifier of the end-user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Default for ChatCompletionRequest {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl ChatCompletionRequest {
    /// Create an empty request for `model`.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            model: model.into(),
            temperature: None,
            max_tokens: None,
            top_p: None,
            stream: None,
            stop: None,
            n: None,
            frequency_penalty: None,
            presence_penalty: None,
            tools: None,
            tool_choice: None,
            user: None,
        }
    }

    /// Append a message to the conversation.
    #[must_use]
    pub fn message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Append several messages, keeping their order.
    #[must_use]
    pub fn messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Set temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set top-p sampling.
    #[must_use]
    pub const fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set stop sequences.
    #[must_use]
    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Set the number of completions.
    #[must_use]
    pub const fn with_n(mut self, n: u32) -> Self {
        self.n = Some(n);
        self
    }

    /// Set frequency penalty.
    #[must_use]
    pub const fn with_frequency_penalty(mut self, penalty: f64) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    /// Set presence penalty.
    #[must_use]
    pub const fn with_presence_penalty(mut self, penalty: f64) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    /// Set available tools.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set tool choice.
    #[must_use]
    pub fn with_tool_choice(mut self, choice: impl Into<ToolChoice>) -> Self {
        self.tool_choice = Some(choice.into());
        self
    }

    /// Set the end-user identifier.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Check if tools are configured.
    #[must_use]
    pub fn has_tools(&self) -> bool {
        self.tools.as_ref().is_some_and(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolChoiceMode;
    use serde_json::json;

    #[test]
    fn test_unset_fields_omitted() {
        let request = ChatCompletionRequest::new("m").message(ChatMessage::user("hi"));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"messages": [{"role": "user", "content": "hi"}], "model": "m"})
        );
    }

    #[test]
    fn test_builder_sets_wire_names() {
        let request = ChatCompletionRequest::default()
            .with_temperature(0.5)
            .with_max_tokens(64)
            .with_top_p(0.9)
            .with_stop(vec!["END".to_owned()])
            .with_n(2)
            .with_frequency_penalty(0.1)
            .with_presence_penalty(0.2)
            .with_tool_choice(ToolChoiceMode::None)
            .with_user("u-1");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], DEFAULT_MODEL);
        assert_eq!(value["max_tokens"], 64);
        assert_eq!(value["stop"], json!(["END"]));
        assert_eq!(value["n"], 2);
        assert_eq!(value["tool_choice"], "none");
        assert_eq!(value["user"], "u-1");
        assert!(value.get("stream").is_none());
        assert!(!request.has_tools());
    }

    #[test]
    fn test_message_order_preserved() {
        let request = ChatCompletionRequest::new("m")
            .message(ChatMessage::system("s"))
            .messages([ChatMessage::user("1"), ChatMessage::assistant("2")])
            .message(ChatMessage::user("3"));
        let value = serde_json::to_value(&request).unwrap();
        let contents: Vec<&str> = value["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, ["s", "1", "2", "3"]);
    }
}
