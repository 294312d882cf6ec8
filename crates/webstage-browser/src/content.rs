//! Sanitized page snapshots for downstream consumption.
//!
//! The snapshot is built for model-driven callers: scripts, styles, hidden
//! elements, and comments carry no visual meaning, and unrestricted
//! attributes blow up token counts, so everything outside a fixed
//! allow-list is stripped.

use serde_json::Value;

use crate::cdp::{CdpError, Page};

/// The only attributes that survive a snapshot.
pub const ALLOWED_ATTRIBUTES: &[&str] = &[
    "id",
    "class",
    "name",
    "type",
    "placeholder",
    "value",
    "href",
    "src",
    "alt",
    "title",
    "data-testid",
];

fn snapshot_script() -> String {
    let allowed = Value::from(
        ALLOWED_ATTRIBUTES
            .iter()
            .map(|a| Value::from(*a))
            .collect::<Vec<_>>(),
    );
    format!(
        r#"(function() {{
    if (!document.body) return "";
    const allowed = new Set({allowed});
    const root = document.body.cloneNode(true);

    root.querySelectorAll("script, style, noscript, link[rel='stylesheet']").forEach(el => el.remove());
    root.querySelectorAll("[hidden]").forEach(el => el.remove());
    root.querySelectorAll("[style]").forEach(el => {{
        const style = (el.getAttribute("style") || "").replace(/\s+/g, "").toLowerCase();
        if (style.includes("display:none") || style.includes("visibility:hidden")) el.remove();
    }});

    const stripComments = (node) => {{
        for (const child of Array.from(node.childNodes)) {{
            if (child.nodeType === Node.COMMENT_NODE) child.remove();
            else if (child.nodeType === Node.ELEMENT_NODE) stripComments(child);
        }}
    }};
    stripComments(root);

    const filterAttributes = (el) => {{
        for (const attr of Array.from(el.attributes)) {{
            if (!allowed.has(attr.name.toLowerCase())) el.removeAttribute(attr.name);
        }}
    }};
    filterAttributes(root);
    root.querySelectorAll("*").forEach(filterAttributes);

    return root.outerHTML;
}})()"#,
        allowed = allowed
    )
}

/// Produce the sanitized, attribute-whitelisted HTML snapshot of the body.
pub async fn capture_snapshot(page: &Page) -> Result<String, CdpError> {
    let value = page.evaluate(&snapshot_script()).await?;
    Ok(value.as_str().unwrap_or_default().to_string())
}
