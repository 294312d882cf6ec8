//! Inspection actions: assertions, screenshots, content, popup sweep.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use webstage_protocols::{Action, ActionError, ActionResult};

use super::parse_params;
use crate::dispatch::{ActionContext, ActionHandler};
use crate::selector;
use crate::{content, dom, popups};

// ============================================================================
// assert
// ============================================================================

#[derive(Debug, Deserialize)]
struct AssertParams {
    selector: Option<String>,
    text: Option<String>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Assert visibility and/or text content.
///
/// Three modes: selector+text (visible and contains), selector-only
/// (visible), text-only (any visible text node contains). Calling with
/// neither is a validation failure like any other bad parameter; assertion
/// misses are reported with `visible: false` and a descriptive error.
pub struct AssertHandler;

#[async_trait]
impl ActionHandler for AssertHandler {
    fn action(&self) -> Action {
        Action::Assert
    }

    fn validate(&self, params: &Value) -> Result<(), ActionError> {
        let selector = present(params.get("selector").and_then(Value::as_str));
        let text = present(params.get("text").and_then(Value::as_str));
        if selector.is_none() && text.is_none() {
            return Err(ActionError::Validation(
                "assert requires a \"selector\", a \"text\", or both".to_string(),
            ));
        }
        if let Some(sel) = selector {
            selector::validate(sel).map_err(ActionError::Validation)?;
        }
        Ok(())
    }

    async fn execute(&self, ctx: Arc<ActionContext>, params: Value) -> Result<ActionResult, ActionError> {
        let p: AssertParams = parse_params(params)?;
        let selector = present(p.selector.as_deref()).map(str::to_string);
        let text = present(p.text.as_deref()).map(str::to_string);
        let page = ctx.session.ensure().await?;

        match (selector, text) {
            (Some(sel), Some(expected)) => {
                let probe = dom::probe_element(&page, &sel)
                    .await
                    .map_err(|e| ActionError::Execution(format!("Assertion probe failed: {}", e)))?;
                match probe.state.as_str() {
                    "missing" => Ok(ActionResult::fail(format!("Element {} not found", sel))
                        .with("visible", json!(false))),
                    "hidden" => Ok(ActionResult::fail(format!("Element {} is not visible", sel))
                        .with("visible", json!(false))),
                    _ => {
                        if probe.text.contains(&expected) {
                            Ok(ActionResult::ok(format!(
                                "Element {} is visible and contains {:?}",
                                sel, expected
                            ))
                            .with("visible", json!(true)))
                        } else {
                            // Quote what was actually there so the mismatch
                            // is diagnosable from the result alone.
                            Ok(ActionResult::fail(format!(
                                "Element {} is visible but does not contain {:?}; found {:?}",
                                sel,
                                expected,
                                truncate(&probe.text, 200)
                            ))
                            .with("visible", json!(true))
                            .with("foundText", json!(truncate(&probe.text, 200))))
                        }
                    }
                }
            }
            (Some(sel), None) => {
                let probe = dom::probe_element(&page, &sel)
                    .await
                    .map_err(|e| ActionError::Execution(format!("Assertion probe failed: {}", e)))?;
                if probe.state == "visible" {
                    Ok(ActionResult::ok(format!("Element {} is visible", sel)).with("visible", json!(true)))
                } else {
                    let cause = if probe.state == "missing" { "not found" } else { "not visible" };
                    Ok(ActionResult::fail(format!("Element {} is {}", sel, cause))
                        .with("visible", json!(false)))
                }
            }
            (None, Some(expected)) => {
                let visible = dom::text_visible(&page, &expected)
                    .await
                    .map_err(|e| ActionError::Execution(format!("Text search failed: {}", e)))?;
                if visible {
                    Ok(ActionResult::ok(format!("Text {:?} is visible on the page", expected))
                        .with("visible", json!(true)))
                } else {
                    Ok(ActionResult::fail(format!("Text {:?} not found on the page", expected))
                        .with("visible", json!(false)))
                }
            }
            // Unreachable past validation.
            (None, None) => Err(ActionError::Validation(
                "assert requires a \"selector\", a \"text\", or both".to_string(),
            )),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

// ============================================================================
// screenshot
// ============================================================================

/// Full-viewport screenshot with no overlay.
pub struct ScreenshotHandler;

#[async_trait]
impl ActionHandler for ScreenshotHandler {
    fn action(&self) -> Action {
        Action::Screenshot
    }

    fn validate(&self, _params: &Value) -> Result<(), ActionError> {
        Ok(())
    }

    async fn execute(&self, ctx: Arc<ActionContext>, _params: Value) -> Result<ActionResult, ActionError> {
        let page = ctx.session.ensure().await?;
        let bytes = page
            .screenshot_png()
            .await
            .map_err(|e| ActionError::Execution(format!("Failed to capture screenshot: {}", e)))?;
        let saved = ctx
            .store
            .save_png(&bytes)
            .await
            .map_err(|e| ActionError::Execution(format!("Failed to save screenshot: {}", e)))?;

        Ok(ActionResult::ok("Screenshot captured")
            .with("screenshot", json!(saved.name))
            .with("path", json!(saved.path.display().to_string())))
    }
}

// ============================================================================
// getContent
// ============================================================================

/// Sanitized, attribute-whitelisted snapshot of the page body.
pub struct GetContentHandler;

#[async_trait]
impl ActionHandler for GetContentHandler {
    fn action(&self) -> Action {
        Action::GetContent
    }

    fn validate(&self, _params: &Value) -> Result<(), ActionError> {
        Ok(())
    }

    async fn execute(&self, ctx: Arc<ActionContext>, _params: Value) -> Result<ActionResult, ActionError> {
        let page = ctx.session.ensure().await?;
        let html = content::capture_snapshot(&page)
            .await
            .map_err(|e| ActionError::Execution(format!("Failed to capture content: {}", e)))?;

        Ok(ActionResult::ok("Captured page content").with("content", json!(html)))
    }
}

// ============================================================================
// dismissPopups
// ============================================================================

/// Best-effort sweep over common dismiss patterns.
pub struct DismissPopupsHandler;

#[async_trait]
impl ActionHandler for DismissPopupsHandler {
    fn action(&self) -> Action {
        Action::DismissPopups
    }

    fn validate(&self, _params: &Value) -> Result<(), ActionError> {
        Ok(())
    }

    async fn execute(&self, ctx: Arc<ActionContext>, _params: Value) -> Result<ActionResult, ActionError> {
        let page = ctx.session.ensure().await?;
        let clicked = popups::dismiss(&page).await;

        Ok(ActionResult::ok(format!("Clicked {} dismiss pattern(s)", clicked.len()))
            .with("clicked", json!(clicked)))
    }
}
