//! Navigation, delay, and session-reset actions.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use webstage_protocols::{Action, ActionError, ActionResult};

use super::{parse_params, require_string};
use crate::dispatch::{ActionContext, ActionHandler};

const DEFAULT_WAIT_MS: u64 = 2000;

// ============================================================================
// navigate
// ============================================================================

#[derive(Debug, Deserialize)]
struct NavigateParams {
    url: String,
}

/// Navigate the page and wait for the DOM-ready milestone.
pub struct NavigateHandler;

#[async_trait]
impl ActionHandler for NavigateHandler {
    fn action(&self) -> Action {
        Action::Navigate
    }

    fn validate(&self, params: &Value) -> Result<(), ActionError> {
        require_string(params, "url").map(|_| ())
    }

    async fn execute(&self, ctx: Arc<ActionContext>, params: Value) -> Result<ActionResult, ActionError> {
        let p: NavigateParams = parse_params(params)?;
        let page = ctx.session.ensure().await?;

        page.navigate(&p.url)
            .await
            .map_err(|e| ActionError::Execution(format!("Failed to navigate to {}: {}", p.url, e)))?;

        Ok(ActionResult::ok(format!("Navigated to {}", p.url)))
    }
}

// ============================================================================
// wait
// ============================================================================

/// Resolve the delay from either `timeout` or `milliseconds`, clamped to a
/// non-negative integer with a 2000ms default.
pub(crate) fn wait_millis(params: &Value) -> u64 {
    let raw = params
        .get("timeout")
        .or_else(|| params.get("milliseconds"))
        .and_then(Value::as_f64);
    match raw {
        Some(ms) if ms.is_finite() => ms.max(0.0) as u64,
        _ => DEFAULT_WAIT_MS,
    }
}

/// A pure delay: blocks only this action's slot, not the session's
/// availability afterwards. Not a condition poll.
pub struct WaitHandler;

#[async_trait]
impl ActionHandler for WaitHandler {
    fn action(&self) -> Action {
        Action::Wait
    }

    fn validate(&self, _params: &Value) -> Result<(), ActionError> {
        // Anything non-numeric falls back to the default delay.
        Ok(())
    }

    async fn execute(&self, _ctx: Arc<ActionContext>, params: Value) -> Result<ActionResult, ActionError> {
        let ms = wait_millis(&params);
        debug!(ms, "waiting");
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(ActionResult::ok(format!("Waited {}ms", ms)))
    }
}

// ============================================================================
// reset
// ============================================================================

/// Discard the browser context (cookies, storage, workers) and start a
/// fresh one.
pub struct ResetHandler;

#[async_trait]
impl ActionHandler for ResetHandler {
    fn action(&self) -> Action {
        Action::Reset
    }

    fn validate(&self, _params: &Value) -> Result<(), ActionError> {
        Ok(())
    }

    async fn execute(&self, ctx: Arc<ActionContext>, _params: Value) -> Result<ActionResult, ActionError> {
        ctx.session.reset().await?;
        Ok(ActionResult::ok("Browser session reset"))
    }
}
