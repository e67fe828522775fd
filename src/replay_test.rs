use super::*;
use canvas::shape::Geometry;

fn make_script(text: &str) -> Vec<ScriptLine> {
    script::parse(text).unwrap()
}

fn make_shapes(json: &str) -> Vec<canvas::shape::Shape> {
    canvas::sync::deserialize(json).unwrap()
}

fn documents(notifications: &[Notification]) -> Vec<&str> {
    notifications
        .iter()
        .filter_map(|n| match n {
            Notification::DocumentChanged(json) => Some(json.as_str()),
            _ => None,
        })
        .collect()
}

const DRAW_RECT: &str = r#"{"event":"pointer_down","x":10,"y":10}
{"event":"pointer_move","x":40,"y":30}
{"event":"pointer_up","x":40,"y":30}"#;

// =============================================================
// Drawing
// =============================================================

#[test]
fn draw_produces_one_rect() {
    let outcome = run(&EngineConfig::default(), None, &make_script(DRAW_RECT)).unwrap();
    let shapes = make_shapes(&outcome.document);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].geometry(), Geometry::Rect { x: 10.0, y: 10.0, width: 30.0, height: 20.0 });
    assert_eq!(outcome.visuals, 1);
    assert_eq!(outcome.rejected, 0);
}

#[test]
fn draw_notifies_with_final_document_last() {
    let outcome = run(&EngineConfig::default(), None, &make_script(DRAW_RECT)).unwrap();
    let docs = documents(&outcome.notifications);
    assert!(!docs.is_empty());
    assert_eq!(docs.last().copied(), Some(outcome.document.as_str()));
    assert_eq!(outcome.notifications.first(), Some(&Notification::HideContextMenu));
}

#[test]
fn config_tool_picks_shape_kind() {
    let config = EngineConfig { tool: "circle".into(), ..EngineConfig::default() };
    let outcome = run(&config, None, &make_script(DRAW_RECT)).unwrap();
    let shapes = make_shapes(&outcome.document);
    assert_eq!(shapes.len(), 1);
    assert!(matches!(shapes[0].geometry(), Geometry::Circle { .. }));
}

#[test]
fn click_without_drag_leaves_nothing() {
    let script = make_script(
        r#"{"event":"pointer_down","x":10,"y":10}
{"event":"pointer_up","x":10,"y":10}"#,
    );
    let outcome = run(&EngineConfig::default(), None, &script).unwrap();
    assert_eq!(outcome.document, "[]");
    assert_eq!(outcome.visuals, 0);
}

// =============================================================
// Initial document and rejection
// =============================================================

#[test]
fn initial_document_with_defaults_is_echoed_once() {
    let initial = r#"[{"id":"a","type":"rect","x":0,"y":0,"width":50,"height":50}]"#;
    let outcome = run(&EngineConfig::default(), Some(initial), &[]).unwrap();
    assert_eq!(make_shapes(&outcome.document).len(), 1);
    assert_eq!(documents(&outcome.notifications), [outcome.document.as_str()]);
    assert_eq!(outcome.visuals, 1);
}

#[test]
fn canonical_initial_document_is_not_echoed() {
    let first = run(&EngineConfig::default(), None, &make_script(DRAW_RECT)).unwrap();
    let outcome = run(&EngineConfig::default(), Some(first.document.as_str()), &[]).unwrap();
    assert!(documents(&outcome.notifications).is_empty());
    assert_eq!(outcome.document, first.document);
}

#[test]
fn malformed_initial_document_fails() {
    let err = run(&EngineConfig::default(), Some("[{"), &[]).unwrap_err();
    assert!(matches!(err, SyncError::Parse(_)));
}

#[test]
fn rejected_replace_is_counted_and_replay_continues() {
    let initial = r#"[{"id":"a","type":"rect","x":0,"y":0,"width":50,"height":50}]"#;
    let script = make_script(
        r#"{"event":"replace_document","document":"nope"}
{"event":"delete","ids":["a"]}"#,
    );
    let outcome = run(&EngineConfig::default(), Some(initial), &script).unwrap();
    assert_eq!(outcome.rejected, 1);
    assert_eq!(outcome.document, "[]");
}

// =============================================================
// Host notifications
// =============================================================

#[test]
fn right_click_reports_shape() {
    let initial = r#"[{"id":"a","type":"rect","x":0,"y":0,"width":50,"height":50}]"#;
    let script = make_script(r#"{"event":"context_menu","x":20,"y":25}"#);
    let outcome = run(&EngineConfig::default(), Some(initial), &script).unwrap();
    assert!(
        outcome
            .notifications
            .contains(&Notification::ShapeRightClicked { x: 20.0, y: 25.0, id: "a".into() })
    );
}

#[test]
fn right_click_menu_point_is_separate_from_hit_point() {
    let initial = r#"[{"id":"a","type":"rect","x":0,"y":0,"width":50,"height":50}]"#;
    let script = make_script(r#"{"event":"context_menu","x":20,"y":25,"menu_x":120,"menu_y":80}"#);
    let outcome = run(&EngineConfig::default(), Some(initial), &script).unwrap();
    assert!(
        outcome
            .notifications
            .contains(&Notification::ShapeRightClicked { x: 120.0, y: 80.0, id: "a".into() })
    );
}

#[test]
fn lock_sets_and_restores_cursor() {
    let script = make_script(
        r#"{"event":"set_lock","locked":true}
{"event":"set_lock","locked":false}"#,
    );
    let outcome = run(&EngineConfig::default(), None, &script).unwrap();
    let cursors: Vec<&Notification> =
        outcome.notifications.iter().filter(|n| matches!(n, Notification::Cursor(_))).collect();
    assert_eq!(
        cursors,
        [&Notification::Cursor("not-allowed".into()), &Notification::Cursor("default".into())]
    );
}

#[test]
fn locked_engine_ignores_drawing() {
    let mut text = String::from("{\"event\":\"set_lock\",\"locked\":true}\n");
    text.push_str(DRAW_RECT);
    let outcome = run(&EngineConfig::default(), None, &make_script(&text)).unwrap();
    assert_eq!(outcome.document, "[]");
}
