use super::*;

#[test]
fn test_size_clamping() {
    assert_eq!(clamp_size(None), 5.0);
    assert_eq!(clamp_size(Some(0.0)), 1.0);
    assert_eq!(clamp_size(Some(-3.0)), 1.0);
    assert_eq!(clamp_size(Some(25.0)), 25.0);
    assert_eq!(clamp_size(Some(500.0)), 50.0);
    assert_eq!(clamp_size(Some(f64::NAN)), 5.0);
}

#[test]
fn test_padding_clamping() {
    assert_eq!(clamp_padding(None), 5.0);
    assert_eq!(clamp_padding(Some(-1.0)), 0.0);
    assert_eq!(clamp_padding(Some(4.0)), 4.0);
    assert_eq!(clamp_padding(Some(100.0)), 30.0);
    assert_eq!(clamp_padding(Some(f64::INFINITY)), 5.0);
}

#[test]
fn test_center_square_centers_on_element_midpoint() {
    let rect = center_square(100.0, 200.0, 80.0, 40.0, 10.0);
    assert_eq!(rect.x, 135.0);
    assert_eq!(rect.y, 215.0);
    assert_eq!(rect.width, 10.0);
    assert_eq!(rect.height, 10.0);
}

#[test]
fn test_padded_box_grows_symmetrically() {
    let rect = padded_box(50.0, 60.0, 100.0, 20.0, 4.0);
    assert_eq!(rect.x, 46.0);
    assert_eq!(rect.y, 56.0);
    assert_eq!(rect.width, 108.0);
    assert_eq!(rect.height, 28.0);
}

#[test]
fn test_padded_box_clamps_at_viewport_origin() {
    let rect = padded_box(2.0, 1.0, 10.0, 10.0, 8.0);
    assert_eq!(rect.x, 0.0);
    assert_eq!(rect.y, 0.0);
}

#[test]
fn test_marker_id_pattern() {
    let id = super::marker_id();
    assert!(id.starts_with("ws-marker-"));
    // Simple-format UUID suffix: 32 hex chars, unique per marker.
    assert_eq!(id.len(), "ws-marker-".len() + 32);
    assert_ne!(id, super::marker_id());
}

#[test]
fn test_removal_script_targets_marker_id() {
    let script = super::removal_script("ws-marker-abc123");
    assert!(script.contains("getElementById(\"ws-marker-abc123\")"));
    assert!(script.contains("removeChild"));
}

#[test]
fn test_color_literal_strips_breakout_characters() {
    assert_eq!(color_literal("#ff0000"), "#ff0000");
    assert_eq!(color_literal("rgb(255, 0, 0)"), "rgb(255, 0, 0)");
    assert_eq!(color_literal("red\";</script>"), "redscript");
}

#[test]
fn test_highlight_rect_serializes_flat() {
    let rect = HighlightRect {
        x: 1.0,
        y: 2.0,
        width: 3.0,
        height: 4.0,
    };
    let json = serde_json::to_value(rect).unwrap();
    assert_eq!(json["x"], 1.0);
    assert_eq!(json["height"], 4.0);
}
