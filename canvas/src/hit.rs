#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HANDLE_HALF;
use crate::doc::DocStore;
use crate::geometry::{Point, near_handle};
use crate::selection::Selection;
use crate::shape::ShapeId;

/// Which part of a shape was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    /// Resize handle, indexed as [`crate::shape::Shape::resize_handles`] orders them.
    Handle(usize),
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub shape_id: ShapeId,
    pub part: HitPart,
}

/// Test which shape (if any) is under `pt`, checking the handles of a
/// single selected shape first, then shape bodies from the top down.
///
/// Handles win over bodies so a handle overlapping another shape can still
/// be grabbed. When two handles overlap, the lower index wins.
#[must_use]
pub fn hit_test(pt: Point, doc: &DocStore, selection: &Selection) -> Option<Hit> {
    if let Some(id) = selection.single()
        && let Some(handles) = selection.active_handles(doc)
        && let Some(index) = handles.iter().position(|h| near_handle(pt, *h, HANDLE_HALF))
    {
        return Some(Hit { shape_id: id.to_owned(), part: HitPart::Handle(index) });
    }

    doc.topmost_at(pt)
        .map(|shape| Hit { shape_id: shape.id().to_owned(), part: HitPart::Body })
}
