//! Per-action handlers.
//!
//! One file per concern, mirroring the action vocabulary: navigation and
//! timing, element interaction, visual highlighting, inspection and
//! assertions, and the vision fallback.

mod highlight;
mod inspect;
mod interaction;
mod navigation;
mod vision;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use webstage_protocols::ActionError;

use crate::dispatch::ActionHandler;
use crate::session::SessionError;

/// All handlers, one per action.
pub(crate) fn registry() -> Vec<Arc<dyn ActionHandler>> {
    vec![
        Arc::new(navigation::NavigateHandler),
        Arc::new(navigation::WaitHandler),
        Arc::new(navigation::ResetHandler),
        Arc::new(interaction::ClickHandler),
        Arc::new(interaction::ClickAtCoordinatesHandler),
        Arc::new(interaction::TypeHandler),
        Arc::new(interaction::SelectHandler),
        Arc::new(highlight::HighlightAtCoordinatesHandler),
        Arc::new(highlight::HighlightTextHandler),
        Arc::new(inspect::AssertHandler),
        Arc::new(inspect::ScreenshotHandler),
        Arc::new(inspect::GetContentHandler),
        Arc::new(inspect::DismissPopupsHandler),
        Arc::new(vision::VisionAnalyzeHandler),
    ]
}

/// Deserialize a typed parameter struct out of the loose bag.
pub(crate) fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, ActionError> {
    serde_json::from_value(params).map_err(|e| ActionError::Validation(format!("Invalid params: {}", e)))
}

/// A required, non-empty string parameter.
pub(crate) fn require_string(params: &Value, key: &str) -> Result<String, ActionError> {
    match params.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(ActionError::Validation(format!(
            "Missing or empty {:?} parameter",
            key
        ))),
    }
}

/// A required finite numeric parameter.
pub(crate) fn require_finite(params: &Value, key: &str) -> Result<f64, ActionError> {
    match params.get(key).and_then(Value::as_f64) {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(ActionError::Validation(format!(
            "Parameter {:?} must be a finite number",
            key
        ))),
    }
}

impl From<SessionError> for ActionError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Unavailable(msg) => ActionError::SessionUnavailable(msg),
            SessionError::Cdp(e) => ActionError::Execution(e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
