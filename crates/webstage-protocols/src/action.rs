//! The fixed action vocabulary and the incoming request shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every operation the executor knows how to perform.
///
/// The set is closed on purpose: callers submit one of these names plus a
/// parameter bag, and anything else is answered with an unknown-action
/// result rather than reaching the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Navigate,
    Click,
    ClickAtCoordinates,
    HighlightAtCoordinates,
    HighlightText,
    Type,
    Select,
    Assert,
    Wait,
    Screenshot,
    VisionAnalyze,
    GetContent,
    Reset,
    DismissPopups,
}

impl Action {
    /// Resolve a wire name to an action, or `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "navigate" => Self::Navigate,
            "click" => Self::Click,
            "clickAtCoordinates" => Self::ClickAtCoordinates,
            "highlightAtCoordinates" => Self::HighlightAtCoordinates,
            "highlightText" => Self::HighlightText,
            "type" => Self::Type,
            "select" => Self::Select,
            "assert" => Self::Assert,
            "wait" => Self::Wait,
            "screenshot" => Self::Screenshot,
            "visionAnalyze" => Self::VisionAnalyze,
            "getContent" => Self::GetContent,
            "reset" => Self::Reset,
            "dismissPopups" => Self::DismissPopups,
            _ => return None,
        })
    }

    /// The wire name of this action.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Navigate => "navigate",
            Self::Click => "click",
            Self::ClickAtCoordinates => "clickAtCoordinates",
            Self::HighlightAtCoordinates => "highlightAtCoordinates",
            Self::HighlightText => "highlightText",
            Self::Type => "type",
            Self::Select => "select",
            Self::Assert => "assert",
            Self::Wait => "wait",
            Self::Screenshot => "screenshot",
            Self::VisionAnalyze => "visionAnalyze",
            Self::GetContent => "getContent",
            Self::Reset => "reset",
            Self::DismissPopups => "dismissPopups",
        }
    }

    /// All actions, in dispatch-table order.
    pub fn all() -> &'static [Action] {
        &[
            Self::Navigate,
            Self::Click,
            Self::ClickAtCoordinates,
            Self::HighlightAtCoordinates,
            Self::HighlightText,
            Self::Type,
            Self::Select,
            Self::Assert,
            Self::Wait,
            Self::Screenshot,
            Self::VisionAnalyze,
            Self::GetContent,
            Self::Reset,
            Self::DismissPopups,
        ]
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An incoming request: an action name plus a loosely-typed parameter bag.
///
/// The action is kept as a raw string so that an unknown name deserializes
/// fine and is rejected by the dispatcher with a proper result, instead of
/// failing at the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub params: Value,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>, params: Value) -> Self {
        Self {
            action: action.into(),
            params,
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
