//! Render adapter: projects document and selection state onto a drawing
//! surface as a stream of create / update / remove operations.
//!
//! The adapter owns the only link between shapes and their visuals: a side
//! table from shape id to an opaque [`VisualHandle`]. Shapes never learn
//! about handles. Each call to [`RenderAdapter::sync`] diffs the document
//! against what was last projected and emits just the changes; a
//! [`RenderAdapter::rebuild`] drops every visual and starts over.
//!
//! The adapter only reads the model. Surfaces receive owned copies of shape
//! values and cannot write back.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;

use crate::doc::DocStore;
use crate::geometry::{Point, Rect};
use crate::input::InputState;
use crate::selection::Selection;
use crate::shape::{Shape, ShapeId};

/// Opaque reference to one visual element on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u64);

/// Selection chrome drawn above the shapes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    /// Box around every selected shape.
    pub selection_box: Option<Rect>,
    /// Resize handle centers, only for a single selection.
    pub handles: Vec<Point>,
    /// The marquee while one is being dragged.
    pub marquee: Option<Rect>,
}

impl Overlay {
    /// Derive the overlay from the current model state.
    #[must_use]
    pub fn from_state(doc: &DocStore, selection: &Selection, input: &InputState) -> Self {
        Self {
            selection_box: selection.bounding_box(doc),
            handles: selection.active_handles(doc).map(Vec::from).unwrap_or_default(),
            marquee: input.marquee(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selection_box.is_none() && self.handles.is_empty() && self.marquee.is_none()
    }
}

/// A single change for a surface to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// Remove every visual element and the overlay.
    Clear,
    /// Add a visual for `shape` above all existing ones.
    Create { handle: VisualHandle, shape: Shape },
    /// Restyle or reshape an existing visual in place.
    Update { handle: VisualHandle, shape: Shape },
    /// Delete a visual.
    Remove { handle: VisualHandle },
    /// Replace the selection chrome.
    Overlay(Overlay),
}

/// Something that can display shapes.
pub trait Surface {
    /// Apply one operation.
    fn apply(&mut self, op: &RenderOp);

    /// Called once after each batch of operations.
    fn present(&mut self) {}
}

struct Projected {
    handle: VisualHandle,
    shape: Shape,
}

/// Side table from shape ids to visuals plus the last projected state.
#[derive(Default)]
pub struct RenderAdapter {
    projected: HashMap<ShapeId, Projected>,
    overlay: Overlay,
    next_handle: u64,
}

impl RenderAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The visual currently standing for `id`, if any.
    #[must_use]
    pub fn handle_of(&self, id: &str) -> Option<VisualHandle> {
        self.projected.get(id).map(|p| p.handle)
    }

    /// Number of live visuals.
    #[must_use]
    pub fn visual_count(&self) -> usize {
        self.projected.len()
    }

    /// Operations bringing the surface in line with the model: removals
    /// first, then creates and updates in document order, then the overlay
    /// if it changed.
    pub fn sync(&mut self, doc: &DocStore, selection: &Selection, input: &InputState) -> Vec<RenderOp> {
        let mut ops = Vec::new();

        let mut gone: Vec<(ShapeId, VisualHandle)> = self
            .projected
            .iter()
            .filter(|(id, _)| !doc.contains(id))
            .map(|(id, p)| (id.clone(), p.handle))
            .collect();
        gone.sort_by_key(|(_, handle)| *handle);
        for (id, handle) in gone {
            self.projected.remove(&id);
            ops.push(RenderOp::Remove { handle });
        }

        for shape in doc.list() {
            match self.projected.get_mut(shape.id()) {
                Some(p) if p.shape == *shape => {}
                Some(p) => {
                    p.shape = shape.clone();
                    ops.push(RenderOp::Update { handle: p.handle, shape: shape.clone() });
                }
                None => {
                    let handle = self.allocate();
                    self.projected.insert(shape.id().to_owned(), Projected { handle, shape: shape.clone() });
                    ops.push(RenderOp::Create { handle, shape: shape.clone() });
                }
            }
        }

        let overlay = Overlay::from_state(doc, selection, input);
        if overlay != self.overlay {
            self.overlay = overlay.clone();
            ops.push(RenderOp::Overlay(overlay));
        }

        ops
    }

    /// Forget every visual and project the model from scratch.
    pub fn rebuild(&mut self, doc: &DocStore, selection: &Selection, input: &InputState) -> Vec<RenderOp> {
        self.projected.clear();
        self.overlay = Overlay::default();
        let mut ops = vec![RenderOp::Clear];
        ops.extend(self.sync(doc, selection, input));
        ops
    }

    fn allocate(&mut self) -> VisualHandle {
        self.next_handle += 1;
        VisualHandle(self.next_handle)
    }
}

/// Retained list of visuals in paint order, maintained from [`RenderOp`]s.
///
/// Surfaces that repaint everything on each frame keep one of these and
/// draw from it in `present`.
#[derive(Debug, Clone, Default)]
pub struct RetainedScene {
    items: Vec<(VisualHandle, Shape)>,
    overlay: Overlay,
}

impl RetainedScene {
    pub fn apply(&mut self, op: &RenderOp) {
        match op {
            RenderOp::Clear => {
                self.items.clear();
                self.overlay = Overlay::default();
            }
            RenderOp::Create { handle, shape } => self.items.push((*handle, shape.clone())),
            RenderOp::Update { handle, shape } => {
                if let Some(item) = self.items.iter_mut().find(|(h, _)| h == handle) {
                    item.1 = shape.clone();
                }
            }
            RenderOp::Remove { handle } => self.items.retain(|(h, _)| h != handle),
            RenderOp::Overlay(overlay) => self.overlay = overlay.clone(),
        }
    }

    /// Shapes bottom first.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.items.iter().map(|(_, shape)| shape)
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Surface for RetainedScene {
    fn apply(&mut self, op: &RenderOp) {
        RetainedScene::apply(self, op);
    }
}
