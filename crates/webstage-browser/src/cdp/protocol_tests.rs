use super::*;
use serde_json::json;

#[test]
fn test_request_serialization_with_session() {
    let request = CdpRequest {
        id: 7,
        method: "Runtime.evaluate".to_string(),
        params: Some(json!({"expression": "1 + 1"})),
        session_id: Some("SESSION".to_string()),
    };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["id"], 7);
    assert_eq!(value["method"], "Runtime.evaluate");
    assert_eq!(value["sessionId"], "SESSION");
    assert_eq!(value["params"]["expression"], "1 + 1");
}

#[test]
fn test_request_omits_absent_fields() {
    let request = CdpRequest {
        id: 1,
        method: "Target.getTargets".to_string(),
        params: None,
        session_id: None,
    };
    let value = serde_json::to_value(&request).unwrap();
    assert!(value.get("params").is_none());
    assert!(value.get("sessionId").is_none());
}

#[test]
fn test_response_deserialization() {
    let response: CdpResponse = serde_json::from_value(json!({
        "id": 3,
        "result": {"frameId": "F1"},
        "sessionId": "S1"
    }))
    .unwrap();
    assert_eq!(response.id, Some(3));
    assert_eq!(response.result.unwrap()["frameId"], "F1");
    assert!(response.error.is_none());
    assert!(response.method.is_none());
}

#[test]
fn test_event_deserialization() {
    let event: CdpResponse = serde_json::from_value(json!({
        "method": "Page.loadEventFired",
        "params": {"timestamp": 1.0}
    }))
    .unwrap();
    assert!(event.id.is_none());
    assert_eq!(event.method.as_deref(), Some("Page.loadEventFired"));
}

#[test]
fn test_error_response_deserialization() {
    let response: CdpResponse = serde_json::from_value(json!({
        "id": 9,
        "error": {"code": -32000, "message": "Could not find node"}
    }))
    .unwrap();
    let error = response.error.unwrap();
    assert_eq!(error.code, -32000);
    assert_eq!(error.message, "Could not find node");
}

#[test]
fn test_browser_version_pascal_case_fields() {
    let version: BrowserVersion = serde_json::from_value(json!({
        "Browser": "HeadlessChrome/131.0.0.0",
        "Protocol-Version": "1.3",
        "User-Agent": "Mozilla/5.0",
        "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/browser/abc"
    }))
    .unwrap();
    assert!(version.browser.starts_with("HeadlessChrome"));
    assert_eq!(version.protocol_version, "1.3");
    assert!(version.web_socket_debugger_url.starts_with("ws://"));
}

#[test]
fn test_box_model_deserialization() {
    let model: BoxModel = serde_json::from_value(json!({
        "content": [0.0, 0.0, 100.0, 0.0, 100.0, 40.0, 0.0, 40.0],
        "padding": [],
        "border": [],
        "margin": [],
        "width": 100,
        "height": 40
    }))
    .unwrap();
    assert_eq!(model.content.len(), 8);
    assert_eq!(model.width, 100);
}

#[test]
fn test_input_enums_serialize_to_cdp_names() {
    assert_eq!(serde_json::to_value(MouseEventType::MousePressed).unwrap(), json!("mousePressed"));
    assert_eq!(serde_json::to_value(MouseButton::Left).unwrap(), json!("left"));
    assert_eq!(serde_json::to_value(KeyEventType::KeyUp).unwrap(), json!("keyUp"));
}
