use super::*;

#[test]
fn test_parse_structured_bare_object() {
    let answer = parse_structured(r#"{"found": true, "x": 120, "y": 340, "description": "blue button"}"#).unwrap();
    assert!(answer.found);
    assert_eq!(answer.x, Some(120.0));
    assert_eq!(answer.y, Some(340.0));
    assert_eq!(answer.description, "blue button");
}

#[test]
fn test_parse_structured_wrapped_in_prose() {
    let reply = "Sure, here is the answer:\n```json\n{\"found\": false, \"description\": \"no such element\"}\n```\nLet me know if you need more.";
    let answer = parse_structured(reply).unwrap();
    assert!(!answer.found);
    assert_eq!(answer.description, "no such element");
}

#[test]
fn test_parse_structured_skips_objects_without_found() {
    let reply = r#"{"note": "ignore me"} and then {"found": true, "x": 5, "y": 6, "description": "ok"}"#;
    let answer = parse_structured(reply).unwrap();
    assert!(answer.found);
    assert_eq!(answer.x, Some(5.0));
}

#[test]
fn test_parse_structured_handles_braces_inside_strings() {
    let reply = r#"{"found": true, "x": 1, "y": 2, "description": "a {weird} label"}"#;
    let answer = parse_structured(reply).unwrap();
    assert_eq!(answer.description, "a {weird} label");
}

#[test]
fn test_parse_structured_none_for_prose() {
    assert!(parse_structured("The button is near the top of the page.").is_none());
    assert!(parse_structured("").is_none());
}

#[test]
fn test_interpret_structured_located() {
    let answer = VisionAnswer {
        found: true,
        x: Some(10.0),
        y: Some(20.0),
        description: "search box".to_string(),
    };
    match interpret_structured(answer, "raw") {
        VisionOutcome::Located { x, y, description } => {
            assert_eq!((x, y), (10.0, 20.0));
            assert_eq!(description, "search box");
        }
        other => panic!("expected Located, got {other:?}"),
    }
}

#[test]
fn test_interpret_structured_rejected() {
    let answer = VisionAnswer {
        found: false,
        x: None,
        y: None,
        description: "element is in the bottom left".to_string(),
    };
    assert!(matches!(
        interpret_structured(answer, "raw"),
        VisionOutcome::Rejected { .. }
    ));
}

#[test]
fn test_interpret_structured_found_without_coordinates_is_freetext() {
    let answer = VisionAnswer {
        found: true,
        x: None,
        y: None,
        description: "somewhere on the page".to_string(),
    };
    assert!(matches!(
        interpret_structured(answer, "raw"),
        VisionOutcome::Freetext { .. }
    ));
}

#[test]
fn test_heuristic_contradiction_rejects() {
    let outcome = apply_heuristic(
        "Is the cart icon in the top right?",
        "The cart icon is shown in the bottom left corner of the screenshot.",
    );
    match outcome {
        VisionOutcome::Rejected { description } => {
            assert!(description.contains("top right"));
            assert!(description.contains("keyword analysis"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[test]
fn test_heuristic_passthrough_without_position() {
    let outcome = apply_heuristic("What does the page show?", "A login form with two fields.");
    match outcome {
        VisionOutcome::Freetext { analysis } => assert_eq!(analysis, "A login form with two fields."),
        other => panic!("expected Freetext, got {other:?}"),
    }
}

#[test]
fn test_prompt_contains_strict_position_rule() {
    let prompt = build_prompt("Is the logo in the top left?");
    assert!(prompt.contains("Is the logo in the top left?"));
    assert!(prompt.contains("\"found\": false"));
    assert!(prompt.contains("Positions are strict"));
}
