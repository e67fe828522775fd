#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn style(color: &str) -> Style {
    Style::solid(color, 2.0, 0.8)
}

fn make_shapes() -> Vec<Shape> {
    vec![
        Shape::rect("shape-a", Rect::new(10.0, 10.0, 30.0, 20.0), style("#0000ff")),
        Shape::circle("shape-b", Point::new(50.0, 60.0), 12.5, style("red")),
    ]
}

// =============================================================
// serialize
// =============================================================

#[test]
fn serialize_empty_is_empty_array() {
    assert_eq!(serialize(&[]).unwrap(), "[]");
}

#[test]
fn serialize_uses_stable_field_names() {
    let text = serialize(&make_shapes()).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value,
        json!([
            {"id": "shape-a", "type": "rect", "fill": "#0000ff", "stroke": "#0000ff",
             "strokeWidth": 2.0, "opacity": 0.8, "x": 10.0, "y": 10.0, "width": 30.0, "height": 20.0},
            {"id": "shape-b", "type": "circle", "fill": "red", "stroke": "red",
             "strokeWidth": 2.0, "opacity": 0.8, "cx": 50.0, "cy": 60.0, "r": 12.5},
        ])
    );
}

#[test]
fn serialize_puts_id_and_type_first() {
    let text = serialize(&make_shapes()[..1]).unwrap();
    assert!(text.starts_with(r#"[{"id":"shape-a","type":"rect","#));
}

#[test]
fn round_trip_preserves_shapes_and_order() {
    let shapes = make_shapes();
    let back = deserialize(&serialize(&shapes).unwrap()).unwrap();
    assert_eq!(back, shapes);
}

// =============================================================
// deserialize: whole-document failures
// =============================================================

#[test]
fn blank_text_is_empty_document() {
    assert!(deserialize("").unwrap().is_empty());
    assert!(deserialize("  \n\t").unwrap().is_empty());
}

#[test]
fn empty_array_is_empty_document() {
    assert!(deserialize("[]").unwrap().is_empty());
}

#[test]
fn malformed_text_is_parse_error() {
    assert!(matches!(deserialize("[{"), Err(SyncError::Parse(_))));
    assert!(matches!(deserialize("not json"), Err(SyncError::Parse(_))));
}

#[test]
fn non_array_root_is_rejected() {
    assert!(matches!(deserialize(r#"{"id": "x"}"#), Err(SyncError::NotAnArray("object"))));
    assert!(matches!(deserialize("42"), Err(SyncError::NotAnArray("number"))));
    assert!(matches!(deserialize("null"), Err(SyncError::NotAnArray("null"))));
}

#[test]
fn error_messages_name_the_problem() {
    let err = deserialize("true").unwrap_err();
    assert_eq!(err.to_string(), "document root must be an array, found boolean");
}

// =============================================================
// deserialize: per-record leniency
// =============================================================

#[test]
fn unknown_kind_is_skipped() {
    let decoded = decode(
        r#"[
            {"id": "t", "type": "triangle", "x": 0, "y": 0},
            {"id": "r", "type": "rect", "x": 1, "y": 2, "width": 3, "height": 4}
        ]"#,
    )
    .unwrap();
    assert_eq!(decoded.shapes.len(), 1);
    assert_eq!(decoded.shapes[0].id(), "r");
    assert_eq!(decoded.skipped, 1);
}

#[test]
fn non_object_entries_are_skipped() {
    let decoded = decode(r#"[1, "two", null, {"id": "c", "type": "circle", "cx": 5, "cy": 5, "r": 2}]"#).unwrap();
    assert_eq!(decoded.shapes.len(), 1);
    assert_eq!(decoded.skipped, 3);
}

#[test]
fn missing_type_is_skipped() {
    let decoded = decode(r#"[{"id": "x", "x": 0, "y": 0, "width": 1, "height": 1}]"#).unwrap();
    assert!(decoded.shapes.is_empty());
    assert_eq!(decoded.skipped, 1);
}

#[test]
fn non_numeric_geometry_is_skipped() {
    let shapes = deserialize(r#"[{"id": "x", "type": "rect", "x": "ten", "y": 0, "width": 1, "height": 1}]"#).unwrap();
    assert!(shapes.is_empty());
}

#[test]
fn field_names_match_case_insensitively() {
    let shapes = deserialize(
        r#"[{"Id": "r", "Type": "Rect", "Fill": "green", "STROKE": "black",
             "StrokeWidth": 4, "Opacity": 0.5, "X": 1, "Y": 2, "Width": 3, "Height": 4}]"#,
    )
    .unwrap();
    assert_eq!(shapes.len(), 1);
    let shape = &shapes[0];
    assert_eq!(shape.id(), "r");
    assert_eq!(shape.kind(), ShapeKind::Rect);
    assert_eq!(shape.style.fill, "green");
    assert_eq!(shape.style.stroke, "black");
    assert_eq!(shape.style.stroke_width, 4.0);
    assert_eq!(shape.style.opacity, 0.5);
    assert_eq!(shape.geometry(), Geometry::Rect { x: 1.0, y: 2.0, width: 3.0, height: 4.0 });
}

#[test]
fn kind_field_is_accepted_when_type_is_absent() {
    let shapes = deserialize(r#"[{"id": "c", "kind": "circle", "cx": 1, "cy": 1, "r": 1}]"#).unwrap();
    assert_eq!(shapes[0].kind(), ShapeKind::Circle);
}

#[test]
fn missing_id_gets_generated() {
    let shapes = deserialize(
        r#"[{"type": "rect", "width": 5, "height": 5}, {"id": "  ", "type": "circle", "r": 3}]"#,
    )
    .unwrap();
    assert_eq!(shapes.len(), 2);
    assert!(shapes[0].id().starts_with("shape-"));
    assert!(shapes[1].id().starts_with("shape-"));
    assert_ne!(shapes[0].id(), shapes[1].id());
}

#[test]
fn missing_style_fields_get_defaults() {
    let shapes = deserialize(r#"[{"id": "r", "type": "rect", "x": 0, "y": 0, "width": 5, "height": 5}]"#).unwrap();
    let s = &shapes[0].style;
    assert_eq!(s.fill, "#0000ff");
    assert_eq!(s.stroke, "#0000ff");
    assert_eq!(s.stroke_width, 2.0);
    assert_eq!(s.opacity, 0.8);
}

#[test]
fn out_of_range_values_are_normalized() {
    let shapes = deserialize(
        r#"[{"id": "r", "type": "rect", "x": 50, "y": 50, "width": -20, "height": -10,
             "strokeWidth": -1, "opacity": 3},
            {"id": "c", "type": "circle", "cx": 0, "cy": 0, "r": -7, "opacity": -0.5}]"#,
    )
    .unwrap();
    assert_eq!(shapes[0].geometry(), Geometry::Rect { x: 30.0, y: 40.0, width: 20.0, height: 10.0 });
    assert_eq!(shapes[0].style.stroke_width, 0.0);
    assert_eq!(shapes[0].style.opacity, 1.0);
    assert_eq!(shapes[1].geometry(), Geometry::Circle { cx: 0.0, cy: 0.0, r: 7.0 });
    assert_eq!(shapes[1].style.opacity, 0.0);
}

#[test]
fn null_fields_count_as_missing() {
    let shapes = deserialize(r#"[{"id": "r", "type": "rect", "fill": null, "x": null, "width": 4, "height": 4}]"#).unwrap();
    assert_eq!(shapes[0].style.fill, "#0000ff");
    assert_eq!(shapes[0].bounding_box().x, 0.0);
}

#[test]
fn duplicate_ids_survive_decoding() {
    // Duplicate handling belongs to the document store.
    let shapes = deserialize(
        r#"[{"id": "d", "type": "rect", "width": 1, "height": 1}, {"id": "d", "type": "circle", "r": 1}]"#,
    )
    .unwrap();
    assert_eq!(shapes.len(), 2);
}

// =============================================================
// same_document
// =============================================================

#[test]
fn same_document_ignores_layout_and_number_spelling() {
    let ours = serialize(&make_shapes()).unwrap();
    let theirs: serde_json::Value = serde_json::from_str(&ours).unwrap();
    let pretty = serde_json::to_string_pretty(&theirs).unwrap();
    assert!(same_document(&pretty, &ours));
    assert!(same_document(r#"[{"x": 10, "id": "a"}]"#, r#"[{"id":"a","x":10.0}]"#));
}

#[test]
fn same_document_sees_real_differences() {
    assert!(!same_document(r#"[{"id":"a","x":10}]"#, r#"[{"id":"a","x":11}]"#));
    assert!(!same_document(r#"[{"id":"a"}]"#, r#"[{"id":"a","fill":"red"}]"#));
    assert!(!same_document(r#"[{"id":"a"},{"id":"b"}]"#, r#"[{"id":"a"}]"#));
    assert!(!same_document("", "[]"));
}
