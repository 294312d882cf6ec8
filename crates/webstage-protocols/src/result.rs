//! The uniform result envelope returned for every action.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of a dispatched action.
///
/// Always delivered as a value: recoverable failures set `success: false`
/// with a descriptive `error`, and callers branch on the `success` field
/// rather than on transport status. Action-specific fields (screenshot
/// names, highlight rectangles, extracted content, ...) are flattened in
/// alongside the fixed ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl ActionResult {
    /// A successful result with a human-readable message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
            data: Map::new(),
        }
    }

    /// A recovered failure with a descriptive error message.
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            data: Map::new(),
        }
    }

    /// Attach an action-specific field to the envelope.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Read back an attached field (mostly for tests).
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
