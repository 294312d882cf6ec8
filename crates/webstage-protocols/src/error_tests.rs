use super::*;

#[test]
fn test_validation_error_is_prefixed_with_action() {
    let err = ActionError::Validation("Invalid selector \":contains('Login')\"".to_string());
    let result = err.into_result("click");
    assert!(!result.success);
    let message = result.error.unwrap();
    assert!(message.starts_with("click: "));
    assert!(message.contains(":contains('Login')"));
}

#[test]
fn test_unknown_action_is_not_prefixed() {
    let err = ActionError::UnknownAction("explode".to_string());
    let result = err.into_result("explode");
    assert_eq!(result.error.as_deref(), Some("Unknown action: explode"));
}

#[test]
fn test_session_unavailable_message() {
    let err = ActionError::SessionUnavailable("Chrome executable not found".to_string());
    assert_eq!(
        err.to_string(),
        "Browser session unavailable: Chrome executable not found"
    );
}

#[test]
fn test_execution_error_carries_cause() {
    let err = ActionError::Execution("Failed to navigate to https://x.test: net::ERR_NAME_NOT_RESOLVED".to_string());
    let result = err.into_result("navigate");
    assert!(result.error.unwrap().contains("net::ERR_NAME_NOT_RESOLVED"));
}
