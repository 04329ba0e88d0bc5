//! Tool declarations and tool calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const FUNCTION: &str = "function";

fn function_type() -> String {
    FUNCTION.to_owned()
}

/// A tool the model may call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// The type of tool (currently always `"function"`).
    #[serde(rename = "type", default = "function_type")]
    pub kind: String,
    /// The function definition.
    pub function: FunctionDefinition,
}

impl Tool {
    /// Declare a function tool.
    #[must_use]
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            kind: function_type(),
            function: FunctionDefinition {
                name: name.into(),
                description: Some(description.into()),
                parameters: Some(parameters),
            },
        }
    }
}

/// Definition of a callable function.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FunctionDefinition {
    /// The name of the function.
    pub name: String,
    /// What the function does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema describing the accepted parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// A complete tool call made by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// The ID of the tool call.
    #[serde(default)]
    pub id: String,
    /// The type of tool call (currently always `"function"`).
    #[serde(rename = "type", default = "function_type")]
    pub kind: String,
    /// The function to call.
    #[serde(default)]
    pub function: FunctionCall,
}

impl ToolCall {
    /// Create a function tool call.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: function_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// A function invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionCall {
    /// The name of the function to call.
    #[serde(default)]
    pub name: String,
    /// The arguments, as a JSON encoded string.
    #[serde(default)]
    pub arguments: String,
}

/// A fragment of a tool call delivered in a streaming chunk.
///
/// Only `index` is guaranteed; the first fragment for an index usually carries
/// the id and function name, later ones append to the arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCallDelta {
    /// Position of the tool call within the message.
    #[serde(default)]
    pub index: u32,
    /// The ID of the tool call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The type of tool call.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Partial function call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionCallDelta>,
}

/// A fragment of a function invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionCallDelta {
    /// Function name, usually only on the first fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Next piece of the JSON encoded arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

/// Tool choice mode for function calling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoiceMode {
    /// Never call tools.
    None,
    /// Model decides whether to call tools.
    Auto,
    /// Model must call at least one tool.
    Required,
}

/// Controls how the model responds to tool declarations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ToolChoice {
    /// One of the predefined modes.
    Mode(ToolChoiceMode),
    /// Force a call to a specific function.
    Function(NamedToolChoice),
}

impl ToolChoice {
    /// Force the model to call the named function.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(NamedToolChoice {
            kind: function_type(),
            function: NamedFunction { name: name.into() },
        })
    }
}

impl From<ToolChoiceMode> for ToolChoice {
    fn from(mode: ToolChoiceMode) -> Self {
        Self::Mode(mode)
    }
}

/// A specific function the model must call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedToolChoice {
    /// Always `"function"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The function to call.
    pub function: NamedFunction,
}

/// Function reference used by [`NamedToolChoice`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedFunction {
    /// Function name.
    pub name: String,
}
