//! Visual highlighting actions.
//!
//! Both variants follow the same shape: inject a marker, screenshot,
//! remove the marker. Removal runs on every exit path, including a failed
//! screenshot, and removal problems are swallowed so they never replace
//! the primary error.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use webstage_protocols::{Action, ActionError, ActionResult};

use super::{parse_params, require_finite, require_string};
use crate::dispatch::{ActionContext, ActionHandler};
use crate::dom;
use crate::overlay::{self, DEFAULT_COLOR, Marker};

// ============================================================================
// highlightAtCoordinates
// ============================================================================

#[derive(Debug, Deserialize)]
struct HighlightAtParams {
    x: f64,
    y: f64,
    size: Option<f64>,
}

/// Square-plus-crosshair marker at a viewport point, photographed and
/// removed.
pub struct HighlightAtCoordinatesHandler;

#[async_trait]
impl ActionHandler for HighlightAtCoordinatesHandler {
    fn action(&self) -> Action {
        Action::HighlightAtCoordinates
    }

    fn validate(&self, params: &Value) -> Result<(), ActionError> {
        require_finite(params, "x")?;
        require_finite(params, "y")?;
        Ok(())
    }

    async fn execute(&self, ctx: Arc<ActionContext>, params: Value) -> Result<ActionResult, ActionError> {
        let p: HighlightAtParams = parse_params(params)?;
        let page = ctx.session.ensure().await?;
        let size = overlay::clamp_size(p.size);

        let marker = Marker::inject_crosshair(page.clone(), p.x, p.y, size, DEFAULT_COLOR)
            .await
            .map_err(|e| ActionError::Execution(format!("Failed to inject marker: {}", e)))?;

        // Screenshot first, cleanup second; the marker must not outlive the
        // screenshot attempt either way.
        let shot = page.screenshot_png().await;
        marker.remove().await;

        let bytes = shot.map_err(|e| {
            ActionError::Execution(format!("Failed to capture highlight screenshot: {}", e))
        })?;
        let saved = ctx
            .store
            .save_png(&bytes)
            .await
            .map_err(|e| ActionError::Execution(format!("Failed to save screenshot: {}", e)))?;

        Ok(ActionResult::ok(format!("Highlighted point ({}, {})", p.x, p.y))
            .with("screenshot", json!(saved.name))
            .with("path", json!(saved.path.display().to_string()))
            .with("x", json!(p.x))
            .with("y", json!(p.y))
            .with("size", json!(size)))
    }
}

// ============================================================================
// highlightText
// ============================================================================

#[derive(Debug, Deserialize)]
struct HighlightTextParams {
    text: String,
    mode: Option<String>,
    padding: Option<f64>,
    size: Option<f64>,
    color: Option<String>,
}

/// Resolve text to a visible element, box or mark it, photograph, remove.
pub struct HighlightTextHandler;

#[async_trait]
impl ActionHandler for HighlightTextHandler {
    fn action(&self) -> Action {
        Action::HighlightText
    }

    fn validate(&self, params: &Value) -> Result<(), ActionError> {
        require_string(params, "text")?;
        match params.get("mode").and_then(Value::as_str) {
            None | Some("box") | Some("marker") => Ok(()),
            Some(other) => Err(ActionError::Validation(format!(
                "Unknown highlight mode {:?}; expected \"box\" or \"marker\"",
                other
            ))),
        }
    }

    async fn execute(&self, ctx: Arc<ActionContext>, params: Value) -> Result<ActionResult, ActionError> {
        let p: HighlightTextParams = parse_params(params)?;
        let page = ctx.session.ensure().await?;

        let found = dom::find_visible_text(&page, &p.text)
            .await
            .map_err(|e| ActionError::Execution(format!("Text search failed: {}", e)))?;

        // No match is a recoverable failure, never an exception.
        let Some(target) = found else {
            return Ok(ActionResult::fail(format!(
                "Text {:?} not found or not visible on the page",
                p.text
            )));
        };

        let rect = match p.mode.as_deref() {
            Some("marker") => overlay::center_square(
                target.x,
                target.y,
                target.width,
                target.height,
                overlay::clamp_size(p.size),
            ),
            // Default mode draws a padded bounding box.
            _ => overlay::padded_box(
                target.x,
                target.y,
                target.width,
                target.height,
                overlay::clamp_padding(p.padding),
            ),
        };
        let color = p.color.as_deref().unwrap_or(DEFAULT_COLOR);

        let marker = Marker::inject_box(page.clone(), &rect, color)
            .await
            .map_err(|e| ActionError::Execution(format!("Failed to inject marker: {}", e)))?;

        let shot = page.screenshot_png().await;
        marker.remove().await;

        let bytes = shot.map_err(|e| {
            ActionError::Execution(format!("Failed to capture highlight screenshot: {}", e))
        })?;
        let saved = ctx
            .store
            .save_png(&bytes)
            .await
            .map_err(|e| ActionError::Execution(format!("Failed to save screenshot: {}", e)))?;

        Ok(ActionResult::ok(format!("Highlighted text {:?}", p.text))
            .with("highlight", json!(rect))
            .with("tag", json!(target.tag))
            .with("screenshot", json!(saved.name))
            .with("path", json!(saved.path.display().to_string())))
    }
}
