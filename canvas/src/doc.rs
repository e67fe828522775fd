//! Document model: the ordered store that owns every shape on the canvas.
//!
//! Insertion order is z-order: the first shape is drawn at the bottom, the
//! last on top. Ids are unique within the store; `add` refuses a duplicate
//! and `replace_all` keeps only the first occurrence of each id.
//!
//! Data flows into this layer from the interaction controller (draw, move,
//! resize, delete) and from inbound sync (`replace_all`). The render adapter
//! and the sync bridge only read it.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use tracing::warn;

use crate::geometry::{Point, Rect};
use crate::shape::{Shape, ShapeId};

/// In-memory, ordered store of shapes.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    shapes: Vec<Shape>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Append a shape on top of the stack. Returns `false`, leaving the
    /// store unchanged, when a shape with the same id already exists.
    pub fn add(&mut self, shape: Shape) -> bool {
        if self.find(shape.id()).is_some() {
            warn!(id = %shape.id(), "refusing to add shape with duplicate id");
            return false;
        }
        self.shapes.push(shape);
        true
    }

    /// Remove a shape by id, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id() == id)?;
        Some(self.shapes.remove(index))
    }

    /// Remove every listed shape that exists. Unknown ids are ignored.
    pub fn remove_many<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<Shape> {
        let wanted: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
        let (removed, kept): (Vec<Shape>, Vec<Shape>) =
            std::mem::take(&mut self.shapes).into_iter().partition(|s| wanted.contains(s.id()));
        self.shapes = kept;
        removed
    }

    /// Clear the store and rebuild it from `shapes`, in order. A shape whose
    /// id repeats an earlier one is dropped.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.shapes.clear();
        let mut seen: HashSet<ShapeId> = HashSet::with_capacity(shapes.len());
        for shape in shapes {
            if !seen.insert(shape.id().to_owned()) {
                warn!(id = %shape.id(), "dropping shape with duplicate id");
                continue;
            }
            self.shapes.push(shape);
        }
    }

    /// Look up a shape by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Mutable lookup by id.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    /// All shapes, bottom first.
    #[must_use]
    pub fn list(&self) -> &[Shape] {
        &self.shapes
    }

    /// The topmost shape whose body contains `p`.
    #[must_use]
    pub fn topmost_at(&self, p: Point) -> Option<&Shape> {
        self.shapes.iter().rev().find(|s| s.hit_test(p))
    }

    /// Ids of every shape overlapping `rect`, bottom first.
    #[must_use]
    pub fn intersecting(&self, rect: &Rect) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|s| s.intersects_rect(rect))
            .map(|s| s.id().to_owned())
            .collect()
    }

    /// Whether a shape with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Number of shapes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the store contains no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
