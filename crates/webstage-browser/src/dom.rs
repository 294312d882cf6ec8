//! Visible-text resolution and assertion probes.
//!
//! These are the deterministic DOM translations of the "find this text"
//! style intents: injected scripts that walk the live document, restricted
//! to elements a user could actually see.

use serde::Deserialize;
use serde_json::Value;

use crate::cdp::{CdpError, Page};

/// JSON-encode a Rust string into a JavaScript string literal, so user
/// input can never break out of an injected script.
pub(crate) fn js_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// Shared visibility rule used by every injected script: rendered size,
/// not display:none / visibility:hidden / opacity:0.
const VISIBLE_JS: &str = r#"const visible = (el) => {
    if (!el) return false;
    const style = window.getComputedStyle(el);
    if (style.display === "none" || style.visibility === "hidden" || parseFloat(style.opacity) === 0) return false;
    const rect = el.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
};"#;

/// Where a text match landed, in viewport pixels after scrolling it into
/// centered view.
#[derive(Debug, Clone, Deserialize)]
pub struct TextMatch {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub tag: String,
}

/// Visibility probe for an element addressed by selector.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementProbe {
    /// `"missing"`, `"hidden"`, or `"visible"`.
    pub state: String,
    /// Trimmed text content, empty for missing elements.
    #[serde(default)]
    pub text: String,
}

/// Resolve `text` to a visible element and scroll it into centered view.
///
/// Two ordered passes: (1) text nodes under body, case-insensitive
/// substring match, nearest element ancestor visible; (2) elements with
/// visible label-like signals (input value/placeholder, button text,
/// aria-label, title, alt). First match in document order wins; there is
/// no secondary ranking.
pub async fn find_visible_text(page: &Page, text: &str) -> Result<Option<TextMatch>, CdpError> {
    let script = format!(
        r#"(function() {{
    const needle = {needle}.toLowerCase();
    {visible}
    let target = null;
    const walker = document.createTreeWalker(document.body, NodeFilter.SHOW_TEXT);
    while (walker.nextNode()) {{
        const node = walker.currentNode;
        const value = (node.textContent || "").toLowerCase();
        if (!value.includes(needle)) continue;
        const parent = node.parentElement;
        if (visible(parent)) {{ target = parent; break; }}
    }}
    if (!target) {{
        const labelled = (el) => {{
            const parts = [el.value, el.placeholder, el.getAttribute("aria-label"), el.getAttribute("title"), el.getAttribute("alt")];
            if (el.tagName === "BUTTON") parts.push(el.textContent);
            return parts.some(p => typeof p === "string" && p.toLowerCase().includes(needle));
        }};
        for (const el of document.body.querySelectorAll("*")) {{
            if (labelled(el) && visible(el)) {{ target = el; break; }}
        }}
    }}
    if (!target) return null;
    target.scrollIntoView({{block: "center", inline: "center"}});
    const rect = target.getBoundingClientRect();
    return {{x: rect.x, y: rect.y, width: rect.width, height: rect.height, tag: target.tagName.toLowerCase()}};
}})()"#,
        needle = js_string(text),
        visible = VISIBLE_JS,
    );

    let value = page.evaluate(&script).await?;
    if value.is_null() {
        return Ok(None);
    }
    let found: TextMatch = serde_json::from_value(value)?;
    Ok(Some(found))
}

/// Whether any text node containing `text` has a visible element ancestor.
/// Text nodes only; label-like attributes are not consulted here.
pub async fn text_visible(page: &Page, text: &str) -> Result<bool, CdpError> {
    let script = format!(
        r#"(function() {{
    const needle = {needle}.toLowerCase();
    {visible}
    const walker = document.createTreeWalker(document.body, NodeFilter.SHOW_TEXT);
    while (walker.nextNode()) {{
        const node = walker.currentNode;
        const value = (node.textContent || "").toLowerCase();
        if (value.includes(needle) && visible(node.parentElement)) return true;
    }}
    return false;
}})()"#,
        needle = js_string(text),
        visible = VISIBLE_JS,
    );

    let value = page.evaluate(&script).await?;
    Ok(value.as_bool().unwrap_or(false))
}

/// Probe an element's visibility and text content for assertions.
pub async fn probe_element(page: &Page, selector: &str) -> Result<ElementProbe, CdpError> {
    let script = format!(
        r#"(function() {{
    const el = document.querySelector({selector});
    if (!el) return {{state: "missing", text: ""}};
    {visible}
    return {{
        state: visible(el) ? "visible" : "hidden",
        text: (el.textContent || "").trim(),
    }};
}})()"#,
        selector = js_string(selector),
        visible = VISIBLE_JS,
    );

    let value = page.evaluate(&script).await?;
    let probe: ElementProbe = serde_json::from_value(value)?;
    Ok(probe)
}
