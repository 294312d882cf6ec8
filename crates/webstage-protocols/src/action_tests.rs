use super::*;
use serde_json::json;

#[test]
fn test_parse_known_actions() {
    assert_eq!(Action::parse("navigate"), Some(Action::Navigate));
    assert_eq!(Action::parse("clickAtCoordinates"), Some(Action::ClickAtCoordinates));
    assert_eq!(Action::parse("highlightText"), Some(Action::HighlightText));
    assert_eq!(Action::parse("dismissPopups"), Some(Action::DismissPopups));
}

#[test]
fn test_parse_unknown_action() {
    assert_eq!(Action::parse("explode"), None);
    assert_eq!(Action::parse(""), None);
    // Names are case-sensitive on the wire.
    assert_eq!(Action::parse("Navigate"), None);
}

#[test]
fn test_name_round_trips_through_parse() {
    for action in Action::all() {
        assert_eq!(Action::parse(action.name()), Some(*action));
    }
}

#[test]
fn test_serde_uses_camel_case() {
    let json = serde_json::to_value(Action::VisionAnalyze).unwrap();
    assert_eq!(json, json!("visionAnalyze"));

    let action: Action = serde_json::from_value(json!("getContent")).unwrap();
    assert_eq!(action, Action::GetContent);
}

#[test]
fn test_request_defaults_params_to_null() {
    let request: ActionRequest = serde_json::from_value(json!({"action": "reset"})).unwrap();
    assert_eq!(request.action, "reset");
    assert!(request.params.is_null());
}

#[test]
fn test_request_carries_param_bag() {
    let request: ActionRequest = serde_json::from_value(json!({
        "action": "navigate",
        "params": {"url": "https://example.com"}
    }))
    .unwrap();
    assert_eq!(request.params["url"], "https://example.com");
}

#[test]
fn test_display_matches_wire_name() {
    assert_eq!(Action::ClickAtCoordinates.to_string(), "clickAtCoordinates");
    assert_eq!(Action::Type.to_string(), "type");
}
