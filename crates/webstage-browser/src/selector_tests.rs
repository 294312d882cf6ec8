use super::*;

#[test]
fn test_accepts_standard_css() {
    assert!(validate("#login").is_ok());
    assert!(validate(".btn-primary").is_ok());
    assert!(validate("button[type='submit']").is_ok());
    assert!(validate("[data-testid='cart']").is_ok());
    assert!(validate("nav > ul li:first-child a").is_ok());
    assert!(validate("input:focus").is_ok());
}

#[test]
fn test_rejects_contains_pseudo() {
    let err = validate(":contains('Login')").unwrap_err();
    assert!(err.contains(":contains()"));
    assert!(err.contains("not supported"));
    assert!(err.contains(":contains('Login')"));
}

#[test]
fn test_rejects_pseudo_anywhere_in_selector() {
    assert!(validate("button:has-text('Save')").is_err());
    assert!(validate("div :text('hello')").is_err());
}

#[test]
fn test_rejection_is_case_insensitive() {
    assert!(validate(":CONTAINS('Login')").is_err());
    assert!(validate("span:Has-Text('x')").is_err());
    assert!(validate("GetByRole('button')").is_err());
    assert!(validate("XPATH://div").is_err());
}

#[test]
fn test_rejects_testing_library_shorthand() {
    let err = validate("getByText('Submit')").unwrap_err();
    assert!(err.contains("getBy"));
}

#[test]
fn test_rejects_xpath_shapes() {
    assert!(validate("//div[@id='x']").is_err());
    assert!(validate("/html/body/div").is_err());
    assert!(validate("xpath://button").is_err());
}

#[test]
fn test_rejects_empty_and_whitespace() {
    assert!(validate("").is_err());
    assert!(validate("   ").is_err());
    assert!(validate("\t\n").is_err());
}

#[test]
fn test_message_suggests_fallback_path() {
    let err = validate(":contains('Login')").unwrap_err();
    assert!(err.contains("attribute selectors"));
    assert!(err.contains("clickAtCoordinates"));
}
