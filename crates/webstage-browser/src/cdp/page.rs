//! The single attached page.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use futures::SinkExt;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, trace};

use super::client::{COMMAND_TIMEOUT, PendingRequest, WsSink};
use super::error::CdpError;
use super::protocol::{BoxModel, CdpRequest, KeyEventType, MouseButton, MouseEventType};
use crate::dom::js_string;

const DOM_READY_TIMEOUT: Duration = Duration::from_secs(30);
const DOM_READY_POLL: Duration = Duration::from_millis(100);

/// One attached page target, sharing the client's WebSocket.
///
/// All action handlers drive the browser through this type. It is created
/// by [`super::CdpClient::create_page`] and becomes invalid once its
/// browser context is disposed.
pub struct Page {
    target_id: String,
    session_id: String,
    ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    pending: Arc<Mutex<HashMap<u64, PendingRequest>>>,
    request_id: Arc<AtomicU64>,
}

impl Page {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
        pending: Arc<Mutex<HashMap<u64, PendingRequest>>>,
        request_id: Arc<AtomicU64>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            ws_tx,
            pending,
            request_id,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Send a CDP command scoped to this page's session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: Some(self.session_id.clone()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP page send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, PendingRequest { tx });

        {
            let mut ws = self.ws_tx.lock().await;
            ws.send(Message::Text(json.into())).await?;
        }

        match tokio::time::timeout(COMMAND_TIMEOUT, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }

    /// Enable the CDP domains the handlers rely on.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("DOM.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        debug!("enabled CDP domains for page {}", self.target_id);
        Ok(())
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate and wait for the DOM-ready milestone.
    ///
    /// Waits for `document.readyState` to leave `"loading"`, not for every
    /// subresource to finish. Slow images or third-party scripts must not
    /// hold up the action pipeline.
    pub async fn navigate(&self, url: &str) -> Result<(), CdpError> {
        let result = self.call("Page.navigate", Some(json!({"url": url}))).await?;

        if let Some(error) = result.get("errorText").and_then(Value::as_str) {
            if !error.is_empty() {
                return Err(CdpError::NavigationFailed(error.to_string()));
            }
        }

        self.wait_for_dom_ready().await?;
        debug!("navigated to {}", url);
        Ok(())
    }

    /// Poll until the document has parsed (readyState is `interactive` or
    /// `complete`).
    pub async fn wait_for_dom_ready(&self) -> Result<(), CdpError> {
        let start = Instant::now();
        loop {
            let state = self.evaluate("document.readyState").await?;
            if let Some(state) = state.as_str() {
                if state == "interactive" || state == "complete" {
                    return Ok(());
                }
            }
            if start.elapsed() > DOM_READY_TIMEOUT {
                return Err(CdpError::Timeout("DOM ready timeout".to_string()));
            }
            tokio::time::sleep(DOM_READY_POLL).await;
        }
    }

    // ========================================================================
    // JavaScript
    // ========================================================================

    /// Evaluate an expression, returning its JSON value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["text"].as_str().unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Raw pointer click at viewport pixel coordinates. No element
    /// resolution; this is the fallback for canvas UIs and vision-derived
    /// coordinates.
    pub async fn click_at(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MousePressed,
                "x": x,
                "y": y,
                "button": MouseButton::Left,
                "clickCount": 1,
            })),
        )
        .await?;

        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MouseReleased,
                "x": x,
                "y": y,
                "button": MouseButton::Left,
                "clickCount": 1,
            })),
        )
        .await?;

        debug!("clicked at ({}, {})", x, y);
        Ok(())
    }

    /// Press and release a key (e.g. "Escape").
    pub async fn press_key(&self, key: &str) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchKeyEvent",
            Some(json!({
                "type": KeyEventType::KeyDown,
                "key": key,
            })),
        )
        .await?;

        self.call(
            "Input.dispatchKeyEvent",
            Some(json!({
                "type": KeyEventType::KeyUp,
                "key": key,
            })),
        )
        .await?;

        Ok(())
    }

    // ========================================================================
    // DOM queries
    // ========================================================================

    /// Node id of the first match, or `None`.
    pub async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        let doc = self.call("DOM.getDocument", Some(json!({"depth": 1}))).await?;
        let root_id = doc["root"]["nodeId"]
            .as_i64()
            .ok_or_else(|| CdpError::InvalidResponse("Missing document root".to_string()))?;

        let result = self
            .call(
                "DOM.querySelector",
                Some(json!({
                    "nodeId": root_id,
                    "selector": selector,
                })),
            )
            .await?;

        let node_id = result["nodeId"].as_i64().unwrap_or(0);
        if node_id == 0 { Ok(None) } else { Ok(Some(node_id)) }
    }

    /// Box model for a node; `None` when the node has no layout (hidden).
    pub async fn get_box_model(&self, node_id: i64) -> Result<Option<BoxModel>, CdpError> {
        let result = self.call("DOM.getBoxModel", Some(json!({"nodeId": node_id}))).await;

        match result {
            Ok(r) => {
                let model: BoxModel = serde_json::from_value(r["model"].clone())?;
                Ok(Some(model))
            }
            Err(CdpError::Protocol { code: -32000, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // ========================================================================
    // Element operations
    // ========================================================================

    /// Click the first element matching `selector` at its content-box
    /// center.
    pub async fn click_selector(&self, selector: &str) -> Result<(), CdpError> {
        let node_id = self
            .query_selector(selector)
            .await?
            .ok_or_else(|| CdpError::ElementNotFound(selector.to_string()))?;

        let box_model = self
            .get_box_model(node_id)
            .await?
            .ok_or_else(|| CdpError::ElementNotFound(format!("{} (not visible)", selector)))?;

        let (x, y) = quad_center(&box_model.content);
        self.click_at(x, y).await
    }

    /// Replace an input's value (no keystroke simulation), firing `input`
    /// and `change` so framework listeners observe the edit.
    pub async fn fill(&self, selector: &str, value: &str) -> Result<(), CdpError> {
        let script = format!(
            r#"(function() {{
    const el = document.querySelector({selector});
    if (!el) return "notfound";
    el.focus();
    el.value = {value};
    el.dispatchEvent(new Event("input", {{bubbles: true}}));
    el.dispatchEvent(new Event("change", {{bubbles: true}}));
    return "ok";
}})()"#,
            selector = js_string(selector),
            value = js_string(value),
        );

        match self.evaluate(&script).await?.as_str() {
            Some("ok") => Ok(()),
            Some("notfound") => Err(CdpError::ElementNotFound(selector.to_string())),
            other => Err(CdpError::InvalidResponse(format!(
                "Unexpected fill result: {:?}",
                other
            ))),
        }
    }

    /// Set a `<select>`'s chosen value and fire `change`.
    pub async fn select_option(&self, selector: &str, value: &str) -> Result<(), CdpError> {
        let script = format!(
            r#"(function() {{
    const el = document.querySelector({selector});
    if (!el) return "notfound";
    const options = Array.from(el.options || []);
    if (!options.some(o => o.value === {value})) return "nooption";
    el.value = {value};
    el.dispatchEvent(new Event("change", {{bubbles: true}}));
    return "ok";
}})()"#,
            selector = js_string(selector),
            value = js_string(value),
        );

        match self.evaluate(&script).await?.as_str() {
            Some("ok") => Ok(()),
            Some("notfound") => Err(CdpError::ElementNotFound(selector.to_string())),
            Some("nooption") => Err(CdpError::JavaScript(format!(
                "No option with value {:?} in {}",
                value, selector
            ))),
            other => Err(CdpError::InvalidResponse(format!(
                "Unexpected select result: {:?}",
                other
            ))),
        }
    }

    // ========================================================================
    // Screenshots
    // ========================================================================

    /// Capture the viewport as PNG bytes.
    pub async fn screenshot_png(&self) -> Result<Vec<u8>, CdpError> {
        use base64::{Engine as _, engine::general_purpose::STANDARD};

        let result = self
            .call("Page.captureScreenshot", Some(json!({"format": "png"})))
            .await?;

        let data = result["data"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing screenshot data".to_string()))?;

        STANDARD
            .decode(data)
            .map_err(|e| CdpError::InvalidResponse(format!("Bad screenshot encoding: {}", e)))
    }
}

/// Center point of a CDP content quad.
pub(crate) fn quad_center(quad: &[f64]) -> (f64, f64) {
    if quad.len() >= 8 {
        let x = (quad[0] + quad[2] + quad[4] + quad[6]) / 4.0;
        let y = (quad[1] + quad[3] + quad[5] + quad[7]) / 4.0;
        (x, y)
    } else {
        (0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_center() {
        let quad = vec![0.0, 0.0, 100.0, 0.0, 100.0, 40.0, 0.0, 40.0];
        assert_eq!(quad_center(&quad), (50.0, 20.0));
    }

    #[test]
    fn test_quad_center_short_quad() {
        assert_eq!(quad_center(&[1.0, 2.0]), (0.0, 0.0));
    }

    #[test]
    fn test_fill_script_escapes_values() {
        // The script builder must JSON-escape user strings so quotes cannot
        // break out of the literal.
        let script = format!("document.querySelector({})", js_string("input[name=\"q\"]"));
        assert!(script.contains("\\\"q\\\""));
    }
}
