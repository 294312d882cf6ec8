//! Transient visual markers injected for highlight screenshots.
//!
//! A marker exists only to be photographed: it is injected, the screenshot
//! is taken, and it is removed again, on every exit path. [`Marker`] models
//! that as a scoped resource; dropping an un-removed marker schedules a
//! best-effort removal so a failure between injection and cleanup cannot
//! leak a node into the page.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cdp::{CdpError, Page};
use crate::dom::js_string;

/// Default marker color.
pub const DEFAULT_COLOR: &str = "#ff0000";

const SIZE_DEFAULT: f64 = 5.0;
const SIZE_MIN: f64 = 1.0;
const SIZE_MAX: f64 = 50.0;
const PADDING_DEFAULT: f64 = 5.0;
const PADDING_MIN: f64 = 0.0;
const PADDING_MAX: f64 = 30.0;

/// A highlight rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HighlightRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Clamp a requested marker size to [1, 50], defaulting to 5.
pub fn clamp_size(size: Option<f64>) -> f64 {
    match size {
        Some(s) if s.is_finite() => s.clamp(SIZE_MIN, SIZE_MAX),
        _ => SIZE_DEFAULT,
    }
}

/// Clamp a requested box padding to [0, 30], defaulting to 5.
pub fn clamp_padding(padding: Option<f64>) -> f64 {
    match padding {
        Some(p) if p.is_finite() => p.clamp(PADDING_MIN, PADDING_MAX),
        _ => PADDING_DEFAULT,
    }
}

/// A square of `size` centered on the rectangle's midpoint (marker mode).
pub fn center_square(x: f64, y: f64, width: f64, height: f64, size: f64) -> HighlightRect {
    let cx = x + width / 2.0;
    let cy = y + height / 2.0;
    HighlightRect {
        x: cx - size / 2.0,
        y: cy - size / 2.0,
        width: size,
        height: size,
    }
}

/// The element's bounding box grown by `padding` on every side (box mode),
/// clamped to the viewport origin.
pub fn padded_box(x: f64, y: f64, width: f64, height: f64, padding: f64) -> HighlightRect {
    HighlightRect {
        x: (x - padding).max(0.0),
        y: (y - padding).max(0.0),
        width: width + padding * 2.0,
        height: height + padding * 2.0,
    }
}

fn marker_id() -> String {
    format!("ws-marker-{}", Uuid::new_v4().simple())
}

/// A marker currently present in the page.
///
/// Call [`Marker::remove`] after the screenshot, whether or not it
/// succeeded; removal errors are swallowed so they never mask the primary
/// failure. An un-removed marker is cleaned up from `Drop` as a backstop.
pub struct Marker {
    id: String,
    page: Option<Arc<Page>>,
}

impl Marker {
    /// Inject a square-plus-crosshair marker centered at viewport pixel
    /// coordinates.
    pub async fn inject_crosshair(
        page: Arc<Page>,
        x: f64,
        y: f64,
        size: f64,
        color: &str,
    ) -> Result<Self, CdpError> {
        let id = marker_id();
        let left = x - size / 2.0;
        let top = y - size / 2.0;
        let arm = size * 2.0;
        let script = format!(
            r#"(function() {{
    const m = document.createElement("div");
    m.id = {id};
    m.style.cssText = "position:fixed;left:{left}px;top:{top}px;width:{size}px;height:{size}px;border:2px solid {color};z-index:2147483647;pointer-events:none;box-sizing:border-box;";
    const h = document.createElement("div");
    h.style.cssText = "position:absolute;top:50%;left:-{arm}px;width:{span}px;height:1px;background:{color};";
    const v = document.createElement("div");
    v.style.cssText = "position:absolute;left:50%;top:-{arm}px;height:{span}px;width:1px;background:{color};";
    m.appendChild(h);
    m.appendChild(v);
    document.body.appendChild(m);
    return m.id;
}})()"#,
            id = js_string(&id),
            left = left,
            top = top,
            size = size,
            arm = arm,
            span = size + arm * 2.0,
            color = color_literal(color),
        );
        page.evaluate(&script).await?;
        debug!(marker = %id, "injected crosshair marker at ({}, {})", x, y);
        Ok(Self {
            id,
            page: Some(page),
        })
    }

    /// Inject a rectangle marker covering a highlight rect.
    pub async fn inject_box(page: Arc<Page>, rect: &HighlightRect, color: &str) -> Result<Self, CdpError> {
        let id = marker_id();
        let script = format!(
            r#"(function() {{
    const m = document.createElement("div");
    m.id = {id};
    m.style.cssText = "position:fixed;left:{x}px;top:{y}px;width:{width}px;height:{height}px;border:3px solid {color};border-radius:2px;z-index:2147483647;pointer-events:none;box-sizing:border-box;";
    document.body.appendChild(m);
    return m.id;
}})()"#,
            id = js_string(&id),
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            color = color_literal(color),
        );
        page.evaluate(&script).await?;
        debug!(marker = %id, "injected box marker");
        Ok(Self {
            id,
            page: Some(page),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Remove the marker from the page. Best-effort: errors are logged and
    /// swallowed.
    pub async fn remove(mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.evaluate(&removal_script(&self.id)).await {
                warn!(marker = %self.id, "marker removal failed: {}", e);
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        // Backstop for paths that never reached remove(); the spawned task
        // is best-effort like remove() itself.
        if let Some(page) = self.page.take() {
            let id = self.id.clone();
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    let _ = page.evaluate(&removal_script(&id)).await;
                });
            }
        }
    }
}

fn removal_script(id: &str) -> String {
    format!(
        r#"(function() {{
    const el = document.getElementById({id});
    if (el && el.parentNode) el.parentNode.removeChild(el);
    return true;
}})()"#,
        id = js_string(id)
    )
}

/// Colors land inside a CSS string inside a JS string literal; strip the
/// characters that could terminate either.
fn color_literal(color: &str) -> String {
    color
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' '))
        .collect()
}

#[cfg(test)]
#[path = "overlay_tests.rs"]
mod tests;
