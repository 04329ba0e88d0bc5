//! Model listing.

use serde::{Deserialize, Serialize};

/// Response from `GET /models`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModelList {
    /// Object type (always `"list"`).
    pub object: String,
    /// Available models.
    pub data: Vec<Model>,
}

impl ModelList {
    /// Find a model by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Model> {
        self.data.iter().find(|m| m.id == id)
    }

    /// Iterate over active models.
    pub fn active(&self) -> impl Iterator<Item = &Model> {
        self.data.iter().filter(|m| m.active)
    }
}

/// Information about a model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Model {
    /// Model identifier, usable as a request's `model`.
    pub id: String,
    /// Object type (always `"model"`).
    pub object: String,
    /// Unix timestamp of creation.
    pub created: i64,
    /// Owning organization.
    pub owned_by: String,
    /// Whether the model is active.
    pub active: bool,
    /// Maximum context length in tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
}
