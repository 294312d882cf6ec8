//! Selector validation, run before any browser call.
//!
//! Non-standard pseudo-selectors fail deep inside the browser with a
//! confusing native error; rejecting them up front turns that into a
//! readable message with a workable alternative.

/// Pseudo-selectors supported only by specific libraries, never by the
/// browser's own `querySelector`.
const NON_STANDARD_PSEUDOS: &[&str] = &[":contains(", ":has-text(", ":text("];

/// Check a candidate selector string.
///
/// Rejects (case-insensitively) library pseudo-selectors, testing-library
/// `getBy` shorthands, anything XPath-shaped, and empty strings. The
/// returned message names the offending selector and suggests the
/// standard-CSS or coordinate fallback. Never panics.
pub fn validate(selector: &str) -> Result<(), String> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Err("Selector is empty".to_string());
    }

    let lower = trimmed.to_lowercase();

    for pseudo in NON_STANDARD_PSEUDOS {
        if lower.contains(pseudo) {
            return Err(format!(
                "Invalid selector {:?}: {}) is not part of standard CSS and is not supported by the browser. \
                 Use attribute selectors, classes, or ids instead, or fall back to clickAtCoordinates \
                 with coordinates from visionAnalyze.",
                trimmed, pseudo,
            ));
        }
    }

    if lower.starts_with("getby") {
        return Err(format!(
            "Invalid selector {:?}: testing-library style getBy* queries are not CSS selectors. \
             Use attribute selectors, classes, or ids instead.",
            trimmed
        ));
    }

    if trimmed.starts_with("//") || trimmed.starts_with('/') || lower.starts_with("xpath:") {
        return Err(format!(
            "Invalid selector {:?}: XPath is not supported. Use a standard CSS selector instead.",
            trimmed
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
