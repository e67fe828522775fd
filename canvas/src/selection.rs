//! Selection manager: the set of selected shape ids and what can be derived
//! from it against the current document.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::HashSet;

use crate::doc::DocStore;
use crate::geometry::{Point, Rect, union_all};
use crate::shape::{Shape, ShapeId};

/// Zero, one or many selected shapes.
///
/// Ids are not checked against the document on insert; callers prune after
/// any removal so the set stays a subset of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<ShapeId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `ids`.
    pub fn select<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<ShapeId>,
    {
        self.ids.clear();
        self.ids.extend(ids.into_iter().map(Into::into));
    }

    /// Add `id` if absent, remove it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_owned());
            true
        }
    }

    /// Drop every id. Returns whether anything was selected before.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.ids.is_empty();
        self.ids.clear();
        had_any
    }

    /// Selected ids in no particular order.
    #[must_use]
    pub fn current(&self) -> &HashSet<ShapeId> {
        &self.ids
    }

    /// Selected ids in document order.
    #[must_use]
    pub fn ordered(&self, doc: &DocStore) -> Vec<ShapeId> {
        doc.list()
            .iter()
            .filter(|s| self.ids.contains(s.id()))
            .map(|s| s.id().to_owned())
            .collect()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The id when exactly one shape is selected.
    #[must_use]
    pub fn single(&self) -> Option<&str> {
        if self.ids.len() == 1 {
            self.ids.iter().next().map(String::as_str)
        } else {
            None
        }
    }

    /// Forget ids no longer present in `doc`. Returns whether anything was dropped.
    pub fn prune(&mut self, doc: &DocStore) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| doc.contains(id));
        self.ids.len() != before
    }

    /// Box spanning every selected shape, or `None` for an empty selection.
    #[must_use]
    pub fn bounding_box(&self, doc: &DocStore) -> Option<Rect> {
        union_all(
            doc.list()
                .iter()
                .filter(|s| self.ids.contains(s.id()))
                .map(Shape::bounding_box),
        )
    }

    /// Resize handles of the selected shape, present only for a single selection.
    #[must_use]
    pub fn active_handles(&self, doc: &DocStore) -> Option<[Point; 4]> {
        let id = self.single()?;
        doc.find(id).map(Shape::resize_handles)
    }
}
