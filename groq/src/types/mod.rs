//! Wire types for the chat completions and models endpoints.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

mod chunk;
mod message;
mod model;
mod request;
mod response;
mod tool;

pub use chunk::{ChatCompletionChunk, ChunkChoice, MessageDelta};
pub use message::{ChatMessage, Role};
pub use model::{Model, ModelList};
pub use request::{
    ChatCompletionRequest, DEFAULT_MODEL, GEMMA2_9B, LLAMA_3_1_8B_INSTANT,
    LLAMA_3_3_70B_VERSATILE, LLAMA3_8B, LLAMA3_70B, MIXTRAL_8X7B,
};
pub use response::{ChatChoice, ChatCompletionResponse, GroqMetadata, Usage};
pub use tool::{
    FunctionCall, FunctionCallDelta, FunctionDefinition, NamedFunction, NamedToolChoice, Tool,
    ToolCall, ToolCallDelta, ToolChoice, ToolChoiceMode,
};

/// Decode a JSON object payload.
///
/// Every wire type defaults its missing fields, so serde alone would also
/// accept an array as an all-default value. Only objects are accepted here.
pub(crate) fn from_json_object<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    let object = serde_json::from_slice::<Map<String, Value>>(bytes)?;
    serde_json::from_value(Value::Object(object))
}
