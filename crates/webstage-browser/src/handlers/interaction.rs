//! Element interaction actions.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use webstage_protocols::{Action, ActionError, ActionResult};

use super::{parse_params, require_finite, require_string};
use crate::dispatch::{ActionContext, ActionHandler};
use crate::selector;

// ============================================================================
// click
// ============================================================================

#[derive(Debug, Deserialize)]
struct ClickParams {
    selector: String,
}

/// Click the first element matching a CSS selector.
pub struct ClickHandler;

#[async_trait]
impl ActionHandler for ClickHandler {
    fn action(&self) -> Action {
        Action::Click
    }

    fn validate(&self, params: &Value) -> Result<(), ActionError> {
        let sel = require_string(params, "selector")?;
        selector::validate(&sel).map_err(ActionError::Validation)
    }

    async fn execute(&self, ctx: Arc<ActionContext>, params: Value) -> Result<ActionResult, ActionError> {
        let p: ClickParams = parse_params(params)?;
        let page = ctx.session.ensure().await?;

        page.click_selector(&p.selector)
            .await
            .map_err(|e| ActionError::Execution(format!("Failed to click {}: {}", p.selector, e)))?;

        Ok(ActionResult::ok(format!("Clicked {}", p.selector)))
    }
}

// ============================================================================
// clickAtCoordinates
// ============================================================================

#[derive(Debug, Deserialize)]
struct ClickAtParams {
    x: f64,
    y: f64,
}

/// Raw pointer click at viewport pixels, with no element resolution.
///
/// The intended fallback when a target cannot be expressed as a selector
/// (canvas-rendered UI) and coordinates came from vision analysis.
pub struct ClickAtCoordinatesHandler;

#[async_trait]
impl ActionHandler for ClickAtCoordinatesHandler {
    fn action(&self) -> Action {
        Action::ClickAtCoordinates
    }

    fn validate(&self, params: &Value) -> Result<(), ActionError> {
        require_finite(params, "x")?;
        require_finite(params, "y")?;
        Ok(())
    }

    async fn execute(&self, ctx: Arc<ActionContext>, params: Value) -> Result<ActionResult, ActionError> {
        let p: ClickAtParams = parse_params(params)?;
        let page = ctx.session.ensure().await?;

        page.click_at(p.x, p.y)
            .await
            .map_err(|e| ActionError::Execution(format!("Failed to click at ({}, {}): {}", p.x, p.y, e)))?;

        Ok(ActionResult::ok(format!("Clicked at ({}, {})", p.x, p.y)))
    }
}

// ============================================================================
// type
// ============================================================================

#[derive(Debug, Deserialize)]
struct TypeParams {
    selector: String,
    text: String,
}

/// Fill an input's value. A value replacement, not keystroke simulation.
pub struct TypeHandler;

#[async_trait]
impl ActionHandler for TypeHandler {
    fn action(&self) -> Action {
        Action::Type
    }

    fn validate(&self, params: &Value) -> Result<(), ActionError> {
        let sel = require_string(params, "selector")?;
        selector::validate(&sel).map_err(ActionError::Validation)?;
        if params.get("text").and_then(Value::as_str).is_none() {
            return Err(ActionError::Validation(
                "Missing \"text\" parameter".to_string(),
            ));
        }
        Ok(())
    }

    async fn execute(&self, ctx: Arc<ActionContext>, params: Value) -> Result<ActionResult, ActionError> {
        let p: TypeParams = parse_params(params)?;
        let page = ctx.session.ensure().await?;

        page.fill(&p.selector, &p.text)
            .await
            .map_err(|e| ActionError::Execution(format!("Failed to type into {}: {}", p.selector, e)))?;

        Ok(ActionResult::ok(format!("Typed text into {}", p.selector)))
    }
}

// ============================================================================
// select
// ============================================================================

#[derive(Debug, Deserialize)]
struct SelectParams {
    selector: String,
    value: String,
}

/// Set a selection control's chosen value.
pub struct SelectHandler;

#[async_trait]
impl ActionHandler for SelectHandler {
    fn action(&self) -> Action {
        Action::Select
    }

    fn validate(&self, params: &Value) -> Result<(), ActionError> {
        let sel = require_string(params, "selector")?;
        selector::validate(&sel).map_err(ActionError::Validation)?;
        require_string(params, "value").map(|_| ())
    }

    async fn execute(&self, ctx: Arc<ActionContext>, params: Value) -> Result<ActionResult, ActionError> {
        let p: SelectParams = parse_params(params)?;
        let page = ctx.session.ensure().await?;

        page.select_option(&p.selector, &p.value)
            .await
            .map_err(|e| {
                ActionError::Execution(format!("Failed to select {:?} in {}: {}", p.value, p.selector, e))
            })?;

        Ok(ActionResult::ok(format!("Selected {:?} in {}", p.value, p.selector)))
    }
}
