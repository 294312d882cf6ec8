//! Best-effort popup and cookie-banner dismissal.
//!
//! A fixed priority list of dismiss patterns, tried in order after a single
//! Escape press. Nothing here is guaranteed: every per-pattern and
//! per-click failure is caught and the sweep moves on.

use std::time::Duration;

use tracing::debug;

use crate::cdp::Page;
use crate::dom::js_string;

/// Dismiss patterns in priority order: explicit close controls first,
/// cookie-consent buttons second, generic dismissers last.
pub const DISMISS_PATTERNS: &[&str] = &[
    "[aria-label='Close']",
    "[aria-label='close']",
    "[aria-label='Dismiss']",
    "button.close",
    ".modal-close",
    ".popup-close",
    "[data-dismiss='modal']",
    "#onetrust-accept-btn-handler",
    ".cc-dismiss",
    ".cookie-accept",
    "[id*='cookie'] button",
    "[class*='cookie-banner'] button",
    "button[title='Close']",
];

/// Per-pattern clicks are capped so a page full of matches cannot turn the
/// sweep into a click storm.
const MAX_CLICKS_PER_PATTERN: usize = 3;

/// Budget for each pattern's locate-and-click pass.
const PER_PATTERN_TIMEOUT: Duration = Duration::from_secs(2);

fn click_pattern_script(pattern: &str) -> String {
    format!(
        r#"(function() {{
    let clicked = 0;
    let els;
    try {{ els = document.querySelectorAll({pattern}); }} catch (e) {{ return 0; }}
    for (const el of els) {{
        if (clicked >= {max}) break;
        const rect = el.getBoundingClientRect();
        const style = window.getComputedStyle(el);
        if (rect.width === 0 || rect.height === 0 || style.display === "none" || style.visibility === "hidden") continue;
        try {{ el.click(); clicked += 1; }} catch (e) {{}}
    }}
    return clicked;
}})()"#,
        pattern = js_string(pattern),
        max = MAX_CLICKS_PER_PATTERN,
    )
}

/// Run the dismissal sweep, returning the patterns that actually clicked
/// something. Explicitly best-effort; leftover popups are not an error.
pub async fn dismiss(page: &Page) -> Vec<String> {
    // One Escape first; many modals close on it and save the whole sweep.
    let _ = page.press_key("Escape").await;

    let mut clicked_patterns = Vec::new();
    for pattern in DISMISS_PATTERNS {
        let result = tokio::time::timeout(
            PER_PATTERN_TIMEOUT,
            page.evaluate(&click_pattern_script(pattern)),
        )
        .await;

        match result {
            Ok(Ok(value)) => {
                let clicks = value.as_u64().unwrap_or(0);
                if clicks > 0 {
                    debug!(pattern, clicks, "dismissed popup element(s)");
                    clicked_patterns.push(pattern.to_string());
                }
            }
            Ok(Err(e)) => {
                debug!(pattern, "dismiss pattern failed: {}", e);
            }
            Err(_) => {
                debug!(pattern, "dismiss pattern timed out");
            }
        }
    }
    clicked_patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_controls_precede_cookie_patterns() {
        let close = DISMISS_PATTERNS.iter().position(|p| *p == "[aria-label='Close']").unwrap();
        let cookie = DISMISS_PATTERNS
            .iter()
            .position(|p| *p == "#onetrust-accept-btn-handler")
            .unwrap();
        assert!(close < cookie);
    }

    #[test]
    fn test_click_script_caps_clicks_and_requires_visibility() {
        let script = click_pattern_script(".modal-close");
        assert!(script.contains("clicked >= 3"));
        assert!(script.contains("getBoundingClientRect"));
        assert!(script.contains("visibility"));
        // The pattern itself is embedded as a JSON string literal.
        assert!(script.contains("querySelectorAll(\".modal-close\")"));
    }

    #[test]
    fn test_click_script_swallows_selector_errors() {
        // Invalid patterns must return 0 instead of throwing out of the page.
        let script = click_pattern_script("[broken");
        assert!(script.contains("catch (e) { return 0; }"));
    }
}
