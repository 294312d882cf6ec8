use super::*;

#[test]
fn test_expected_position_finds_compound_phrase() {
    assert_eq!(
        expected_position("Is the cart icon in the top right corner?"),
        Some("top right".to_string())
    );
    assert_eq!(
        expected_position("Is the logo in the top-left?"),
        Some("top left".to_string())
    );
}

#[test]
fn test_expected_position_finds_simple_phrase() {
    assert_eq!(expected_position("Is the footer at the bottom?"), Some("bottom".to_string()));
    assert_eq!(expected_position("Is the dialog in the center?"), Some("center".to_string()));
}

#[test]
fn test_expected_position_absent() {
    assert_eq!(expected_position("Is there a login button?"), None);
}

#[test]
fn test_mentioned_positions_masks_compounds() {
    let mentioned = mentioned_positions("The icon sits in the top right of the page");
    assert_eq!(mentioned, vec!["top right".to_string()]);
}

#[test]
fn test_contradiction_when_other_position_named() {
    // The question expected "top right"; the reply places it bottom left.
    assert!(contradicts(
        "The cart icon is visible, but it appears in the bottom left of the page.",
        "top right"
    ));
}

#[test]
fn test_no_contradiction_when_expected_position_confirmed() {
    assert!(!contradicts(
        "Yes, the cart icon is in the top right corner of the header.",
        "top right"
    ));
}

#[test]
fn test_no_contradiction_when_no_position_mentioned() {
    assert!(!contradicts("The cart icon is clearly visible on the page.", "top right"));
}

#[test]
fn test_explicit_wrong_position_language() {
    assert!(contradicts(
        "The element exists but is in the wrong position.",
        "center"
    ));
}

#[test]
fn test_hyphenated_positions_normalize() {
    assert!(contradicts("It is anchored to the bottom-right.", "top left"));
}

#[test]
fn test_compound_reply_does_not_match_component_expectation_falsely() {
    // Reply says "top right"; expectation is "top", and "top right" was
    // masked, so only the compound remains. "top right" starts with "top",
    // which the substring check on the phrase list does not conflate.
    let mentioned = mentioned_positions("in the top right");
    assert!(!mentioned.contains(&"top".to_string()));
}
