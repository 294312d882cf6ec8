//! Error taxonomy for action execution.

use thiserror::Error;

use crate::ActionResult;

/// Everything that can go wrong while dispatching one action.
///
/// All four variants are recovered locally by the dispatcher and delivered
/// as a normal [`ActionResult`] with `success: false`; callers branch on
/// that field. Nothing here is allowed to take the process down.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Malformed parameters, caught before any browser call.
    #[error("{0}")]
    Validation(String),

    /// The browser or DOM operation itself failed; the underlying cause is
    /// embedded in the message.
    #[error("{0}")]
    Execution(String),

    /// The action name is not part of the vocabulary.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Lazy session initialization failed (browser missing, launch or
    /// connect error).
    #[error("Browser session unavailable: {0}")]
    SessionUnavailable(String),
}

impl ActionError {
    /// Convert into the uniform failure envelope, prefixing the error text
    /// with the action's wire name so callers can tell which step failed.
    pub fn into_result(self, action: &str) -> ActionResult {
        match self {
            ActionError::UnknownAction(_) => ActionResult::fail(self.to_string()),
            _ => ActionResult::fail(format!("{}: {}", action, self)),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
