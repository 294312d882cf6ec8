//! Action dispatch: name resolution, validation, serialized execution.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, error};

use webstage_protocols::{Action, ActionError, ActionRequest, ActionResult};
use webstage_vision::VisionAnalyzer;

use crate::handlers;
use crate::session::SessionManager;
use crate::store::ScreenshotStore;

/// Shared dependencies handed to every handler.
pub struct ActionContext {
    pub session: Arc<SessionManager>,
    pub store: Arc<ScreenshotStore>,
    /// Absent when no vision model is configured; visionAnalyze then
    /// reports a recoverable failure.
    pub vision: Option<Arc<VisionAnalyzer>>,
}

/// One action implementation.
///
/// `validate` is synchronous and browser-free so parameter checking can be
/// unit-tested without a session; `execute` performs the browser work.
/// Handlers report their own recoverable failures as `Err(ActionError)` or
/// as an `ActionResult` with `success: false`; they never panic on bad
/// input.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// The action this handler implements.
    fn action(&self) -> Action;

    /// Check the raw parameter bag before any browser call.
    fn validate(&self, params: &Value) -> Result<(), ActionError>;

    /// Execute against the current session.
    async fn execute(&self, ctx: Arc<ActionContext>, params: Value) -> Result<ActionResult, ActionError>;
}

/// Resolves actions to handlers and runs them one at a time.
pub struct Dispatcher {
    ctx: Arc<ActionContext>,
    handlers: HashMap<Action, Arc<dyn ActionHandler>>,
    /// Single-writer gate over the shared page. Tokio's mutex queues
    /// waiters fairly, so actions run strictly in arrival order.
    gate: Mutex<()>,
}

impl Dispatcher {
    pub fn new(ctx: ActionContext) -> Self {
        let mut map: HashMap<Action, Arc<dyn ActionHandler>> = HashMap::new();
        for handler in handlers::registry() {
            map.insert(handler.action(), handler);
        }
        debug_assert_eq!(map.len(), Action::all().len());

        Self {
            ctx: Arc::new(ctx),
            handlers: map,
            gate: Mutex::new(()),
        }
    }

    /// Dispatch one request to its handler and normalize the outcome.
    ///
    /// Every failure mode is delivered as a result object: unknown action,
    /// validation error, execution error, session unavailable, and even a
    /// panicking handler (isolated on its own task and logged). Callers
    /// branch on `success`, not on transport status.
    pub async fn dispatch(&self, request: ActionRequest) -> ActionResult {
        let Some(action) = Action::parse(&request.action) else {
            return ActionError::UnknownAction(request.action.clone()).into_result(&request.action);
        };
        let Some(handler) = self.handlers.get(&action).cloned() else {
            return ActionError::UnknownAction(request.action.clone()).into_result(&request.action);
        };

        let _slot = self.gate.lock().await;
        debug!(action = action.name(), "dispatching action");

        if let Err(e) = handler.validate(&request.params) {
            return e.into_result(action.name());
        }

        let ctx = self.ctx.clone();
        let params = request.params;
        let task = tokio::spawn(async move { handler.execute(ctx, params).await });

        match task.await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => e.into_result(action.name()),
            Err(join_error) => {
                // A panic inside a handler must never take the service down.
                error!(action = action.name(), "handler panicked: {}", join_error);
                ActionError::Execution("internal handler failure".to_string())
                    .into_result(action.name())
            }
        }
    }

    /// The shared context (liveness probes read the session through it).
    pub fn context(&self) -> Arc<ActionContext> {
        self.ctx.clone()
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
