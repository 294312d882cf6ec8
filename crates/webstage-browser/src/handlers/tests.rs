use serde_json::json;

use webstage_protocols::{Action, ActionError};

use super::navigation::wait_millis;
use super::*;
use crate::dispatch::ActionHandler;

#[test]
fn test_require_string() {
    let params = json!({"url": "https://example.com", "empty": "  "});
    assert_eq!(require_string(&params, "url").unwrap(), "https://example.com");
    assert!(require_string(&params, "empty").is_err());
    assert!(require_string(&params, "missing").is_err());
    assert!(require_string(&json!({"url": 42}), "url").is_err());
}

#[test]
fn test_require_finite() {
    let params = json!({"x": 10.5, "y": "12"});
    assert_eq!(require_finite(&params, "x").unwrap(), 10.5);
    // Strings are not coerced.
    assert!(require_finite(&params, "y").is_err());
    assert!(require_finite(&params, "z").is_err());
}

#[test]
fn test_wait_millis_defaults_and_clamps() {
    assert_eq!(wait_millis(&json!({})), 2000);
    assert_eq!(wait_millis(&json!({"timeout": 500})), 500);
    assert_eq!(wait_millis(&json!({"milliseconds": 250})), 250);
    // "timeout" wins when both are present.
    assert_eq!(wait_millis(&json!({"timeout": 100, "milliseconds": 900})), 100);
    // Negative delays clamp to zero, junk falls back to the default.
    assert_eq!(wait_millis(&json!({"timeout": -50})), 0);
    assert_eq!(wait_millis(&json!({"timeout": "soon"})), 2000);
    // Fractional delays truncate to whole milliseconds.
    assert_eq!(wait_millis(&json!({"timeout": 10.9})), 10);
}

#[test]
fn test_navigate_validation() {
    let handler = super::navigation::NavigateHandler;
    assert!(handler.validate(&json!({"url": "https://example.com"})).is_ok());
    assert!(handler.validate(&json!({"url": ""})).is_err());
    assert!(handler.validate(&json!({})).is_err());
}

#[test]
fn test_click_validation_rejects_pseudo_selector() {
    let handler = super::interaction::ClickHandler;
    let err = handler
        .validate(&json!({"selector": ":contains('Login')"}))
        .unwrap_err();
    match err {
        ActionError::Validation(msg) => {
            assert!(msg.contains(":contains()"));
            assert!(msg.contains("not supported"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn test_click_at_coordinates_validation() {
    let handler = super::interaction::ClickAtCoordinatesHandler;
    assert!(handler.validate(&json!({"x": 10, "y": 20})).is_ok());
    assert!(handler.validate(&json!({"x": 10})).is_err());
    assert!(handler.validate(&json!({"x": "10", "y": 20})).is_err());
}

#[test]
fn test_type_validation_requires_text_but_allows_empty() {
    let handler = super::interaction::TypeHandler;
    assert!(handler.validate(&json!({"selector": "#email", "text": "a@b.c"})).is_ok());
    // An empty string is a legitimate "clear the field" request.
    assert!(handler.validate(&json!({"selector": "#email", "text": ""})).is_ok());
    assert!(handler.validate(&json!({"selector": "#email"})).is_err());
    assert!(handler.validate(&json!({"selector": "//input", "text": "x"})).is_err());
}

#[test]
fn test_select_validation() {
    let handler = super::interaction::SelectHandler;
    assert!(handler.validate(&json!({"selector": "#country", "value": "DE"})).is_ok());
    assert!(handler.validate(&json!({"selector": "#country"})).is_err());
}

#[test]
fn test_assert_validation_requires_selector_or_text() {
    let handler = super::inspect::AssertHandler;
    assert!(handler.validate(&json!({"selector": "#msg"})).is_ok());
    assert!(handler.validate(&json!({"text": "Welcome back"})).is_ok());
    assert!(handler.validate(&json!({"selector": "#msg", "text": "hi"})).is_ok());

    let err = handler.validate(&json!({})).unwrap_err();
    assert!(matches!(err, ActionError::Validation(_)));
    // Whitespace-only values do not count as provided.
    assert!(handler.validate(&json!({"selector": " ", "text": ""})).is_err());
}

#[test]
fn test_assert_validation_checks_selector_syntax() {
    let handler = super::inspect::AssertHandler;
    assert!(handler.validate(&json!({"selector": "getByRole('button')"})).is_err());
}

#[test]
fn test_highlight_text_validation_modes() {
    let handler = super::highlight::HighlightTextHandler;
    assert!(handler.validate(&json!({"text": "Sign in"})).is_ok());
    assert!(handler.validate(&json!({"text": "Sign in", "mode": "box"})).is_ok());
    assert!(handler.validate(&json!({"text": "Sign in", "mode": "marker"})).is_ok());
    assert!(handler.validate(&json!({"text": "Sign in", "mode": "sparkle"})).is_err());
    assert!(handler.validate(&json!({"mode": "box"})).is_err());
}

#[test]
fn test_highlight_at_coordinates_validation() {
    let handler = super::highlight::HighlightAtCoordinatesHandler;
    assert!(handler.validate(&json!({"x": 1, "y": 2})).is_ok());
    assert!(handler.validate(&json!({"x": 1, "y": 2, "size": 200})).is_ok());
    assert!(handler.validate(&json!({"y": 2})).is_err());
}

#[test]
fn test_vision_validation_requires_question() {
    let handler = super::vision::VisionAnalyzeHandler;
    assert!(handler.validate(&json!({"question": "Is the cart in the top right?"})).is_ok());
    assert!(handler.validate(&json!({})).is_err());
}

#[test]
fn test_registry_covers_every_action_exactly_once() {
    let handlers = registry();
    assert_eq!(handlers.len(), Action::all().len());

    let mut covered: Vec<Action> = handlers.iter().map(|h| h.action()).collect();
    covered.sort_by_key(|a| a.name());
    covered.dedup();
    assert_eq!(covered.len(), Action::all().len());
}

#[test]
fn test_session_error_conversion() {
    use crate::session::SessionError;

    let err: ActionError = SessionError::Unavailable("no chrome".to_string()).into();
    assert!(matches!(err, ActionError::SessionUnavailable(_)));

    let err: ActionError = SessionError::Cdp(crate::cdp::CdpError::SessionClosed).into();
    assert!(matches!(err, ActionError::Execution(_)));
}
