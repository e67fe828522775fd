#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Point
// =============================================================

#[test]
fn distance_is_euclidean() {
    assert_eq!(pt(0.0, 0.0).distance_to(pt(3.0, 4.0)), 5.0);
    assert_eq!(pt(3.0, 4.0).distance_to(pt(0.0, 0.0)), 5.0);
}

#[test]
fn delta_from_subtracts_origin() {
    assert_eq!(pt(25.0, 20.0).delta_from(pt(20.0, 15.0)), (5.0, 5.0));
    assert_eq!(pt(0.0, 0.0).delta_from(pt(2.0, 3.0)), (-2.0, -3.0));
}

// =============================================================
// Rect construction
// =============================================================

#[test]
fn from_corners_normalizes_any_drag_direction() {
    let expected = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(Rect::from_corners(pt(10.0, 20.0), pt(40.0, 60.0)), expected);
    assert_eq!(Rect::from_corners(pt(40.0, 60.0), pt(10.0, 20.0)), expected);
    assert_eq!(Rect::from_corners(pt(40.0, 20.0), pt(10.0, 60.0)), expected);
    assert_eq!(Rect::from_corners(pt(10.0, 60.0), pt(40.0, 20.0)), expected);
}

#[test]
fn from_corners_same_point_is_empty() {
    let r = Rect::from_corners(pt(5.0, 5.0), pt(5.0, 5.0));
    assert_eq!(r.width, 0.0);
    assert_eq!(r.height, 0.0);
}

#[test]
fn corners_follow_handle_order() {
    let r = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(r.corners(), [pt(10.0, 20.0), pt(40.0, 20.0), pt(10.0, 60.0), pt(40.0, 60.0)]);
}

// =============================================================
// Containment and intersection
// =============================================================

#[test]
fn contains_includes_edges() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(r.contains(pt(0.0, 0.0)));
    assert!(r.contains(pt(10.0, 10.0)));
    assert!(r.contains(pt(5.0, 5.0)));
    assert!(!r.contains(pt(10.1, 5.0)));
    assert!(!r.contains(pt(5.0, -0.1)));
}

#[test]
fn intersects_overlapping_boxes() {
    let shape = Rect::new(10.0, 10.0, 20.0, 20.0);
    assert!(shape.intersects(&Rect::from_corners(pt(0.0, 0.0), pt(50.0, 50.0))));
    assert!(shape.intersects(&Rect::new(25.0, 25.0, 100.0, 100.0)));
}

#[test]
fn intersects_rejects_disjoint_boxes() {
    let shape = Rect::new(10.0, 10.0, 20.0, 20.0);
    assert!(!shape.intersects(&Rect::from_corners(pt(100.0, 100.0), pt(150.0, 150.0))));
}

#[test]
fn intersects_rejects_shared_edge() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(10.0, 0.0, 10.0, 10.0);
    assert!(!a.intersects(&b));
}

#[test]
fn zero_size_box_inside_intersects() {
    let shape = Rect::new(10.0, 10.0, 20.0, 20.0);
    assert!(shape.intersects(&Rect::new(15.0, 15.0, 0.0, 0.0)));
}

#[test]
fn union_spans_both() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(20.0, 5.0, 10.0, 20.0);
    assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 30.0, 25.0));
}

#[test]
fn union_all_empty_is_none() {
    assert!(union_all(Vec::<Rect>::new()).is_none());
}

#[test]
fn union_all_single_is_identity() {
    let r = Rect::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(union_all([r]), Some(r));
}

#[test]
fn clamp_point_projects_onto_box() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(r.clamp_point(pt(-5.0, 5.0)), pt(0.0, 5.0));
    assert_eq!(r.clamp_point(pt(20.0, 20.0)), pt(10.0, 10.0));
    assert_eq!(r.clamp_point(pt(3.0, 4.0)), pt(3.0, 4.0));
}

// =============================================================
// Circles
// =============================================================

#[test]
fn circle_overlapping_box_edge_intersects() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(circle_intersects_rect(pt(15.0, 5.0), 6.0, &r));
}

#[test]
fn circle_near_corner_but_outside_does_not_intersect() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    // Nearest box point is the corner (10, 10); distance is ~7.07.
    assert!(!circle_intersects_rect(pt(15.0, 15.0), 7.0, &r));
    assert!(circle_intersects_rect(pt(15.0, 15.0), 7.1, &r));
}

#[test]
fn circle_containing_box_intersects() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(circle_intersects_rect(pt(5.0, 5.0), 100.0, &r));
}

#[test]
fn circle_tangent_to_box_does_not_intersect() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(!circle_intersects_rect(pt(15.0, 5.0), 5.0, &r));
}

#[test]
fn circle_cardinals_are_north_east_south_west() {
    let c = circle_cardinals(pt(50.0, 50.0), 10.0);
    assert_eq!(c, [pt(50.0, 40.0), pt(60.0, 50.0), pt(50.0, 60.0), pt(40.0, 50.0)]);
}

// =============================================================
// Handles
// =============================================================

#[test]
fn near_handle_uses_square_extent() {
    let h = pt(100.0, 100.0);
    assert!(near_handle(pt(104.0, 96.0), h, 4.0));
    assert!(!near_handle(pt(104.5, 100.0), h, 4.0));
}
