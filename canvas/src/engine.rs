use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::doc::DocStore;
use crate::geometry::{Point, Rect};
use crate::hit::{self, HitPart};
use crate::host::HostSink;
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState};
use crate::render::{RenderAdapter, Surface};
use crate::selection::Selection;
use crate::shape::{Shape, ShapeId, Style, new_shape_id};
use crate::sync::{self, SyncError};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Cursor shown while the canvas is locked.
const LOCKED_CURSOR: &str = "not-allowed";
/// Cursor shown otherwise.
const DEFAULT_CURSOR: &str = "default";

/// Actions returned from input handlers for the host to process, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Visuals are stale; diff and redraw.
    RenderNeeded,
    /// The document was replaced wholesale; drop every visual and redraw.
    FullRenderNeeded,
    /// The document changed. Carries the serialized shape list.
    DocumentChanged(String),
    /// A shape was right-clicked at container-relative `x`/`y`.
    ShapeRightClicked { x: f64, y: f64, id: ShapeId },
    /// Any open context menu should close.
    HideContextMenu,
    /// Change the canvas cursor.
    SetCursor(String),
}

/// Core engine state: all logic that doesn't depend on a drawing surface.
///
/// Separated from `Engine` so it can be tested without a browser.
pub struct EngineCore {
    pub doc: DocStore,
    pub selection: Selection,
    pub ui: UiState,
    pub input: InputState,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(&EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: &EngineConfig) -> Self {
        Self { doc: DocStore::new(), selection: Selection::new(), ui: config.ui_state(), input: InputState::Idle }
    }

    // --- Host inputs ---

    /// Switch tools by name. Unknown names leave the current tool active.
    ///
    /// Any gesture in progress is finished first. Moving to a drawing tool
    /// clears the selection.
    pub fn set_tool(&mut self, name: &str) -> Vec<Action> {
        let Some(tool) = Tool::parse(name) else {
            debug!(tool = name, "ignoring unknown tool");
            return Vec::new();
        };

        let mut changed = self.finish_gesture();
        self.ui.tool = tool;
        if tool != Tool::Select {
            changed |= self.selection.clear();
        }
        debug!(tool = tool.name(), "tool selected");

        let mut actions = Vec::new();
        self.emit(&mut actions, changed);
        actions
    }

    /// Set the draw color for new shapes and recolor the shape being drawn, if any.
    pub fn set_color(&mut self, color: &str) -> Vec<Action> {
        color.clone_into(&mut self.ui.color);

        let InputState::Drawing { id, .. } = &self.input else {
            return Vec::new();
        };
        let Some(shape) = self.doc.find_mut(id) else {
            return Vec::new();
        };
        shape.set_color(color);

        let mut actions = Vec::new();
        self.emit(&mut actions, true);
        actions
    }

    /// Engage or release the lock.
    ///
    /// Engaging finishes any gesture as it stands, clears the selection and
    /// asks the host to close its context menu. While locked every pointer
    /// and keyboard event is ignored.
    pub fn set_lock(&mut self, locked: bool) -> Vec<Action> {
        if locked == self.ui.locked {
            return Vec::new();
        }

        let mut actions = Vec::new();
        if locked {
            let mut changed = self.finish_gesture();
            changed |= self.selection.clear();
            self.ui.locked = true;
            actions.push(Action::HideContextMenu);
            actions.push(Action::SetCursor(LOCKED_CURSOR.to_owned()));
            self.emit(&mut actions, changed);
        } else {
            self.ui.locked = false;
            actions.push(Action::SetCursor(DEFAULT_CURSOR.to_owned()));
        }
        debug!(locked, "lock changed");
        actions
    }

    /// Replace the whole document from JSON.
    ///
    /// A gesture in progress is abandoned and the selection pruned to the
    /// ids that survive. The host hears back only when loading changed what
    /// it sent: generated ids, normalized geometry, defaulted style or
    /// dropped records.
    ///
    /// # Errors
    ///
    /// Returns the [`SyncError`] for malformed input; nothing changes in that case.
    pub fn replace_document(&mut self, text: &str) -> Result<Vec<Action>, SyncError> {
        let shapes = sync::deserialize(text).inspect_err(|e| {
            warn!(error = %e, "rejecting inbound document");
        })?;

        if !self.input.is_idle() {
            debug!(state = self.input.name(), "abandoning gesture for inbound document");
            self.input = InputState::Idle;
        }
        self.doc.replace_all(shapes);
        self.selection.prune(&self.doc);
        debug!(count = self.doc.len(), "document replaced");

        let mut actions = vec![Action::FullRenderNeeded];
        match self.document_json() {
            Ok(json) if !sync::same_document(text, &json) => {
                debug!("inbound document normalized");
                actions.push(Action::DocumentChanged(json));
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to serialize document"),
        }
        Ok(actions)
    }

    /// Delete one shape. Unknown ids are ignored.
    pub fn delete_shape(&mut self, id: &str) -> Vec<Action> {
        self.delete_shapes(&[id])
    }

    /// Delete every listed shape that exists and clear the selection.
    pub fn delete_shapes<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<Action> {
        let removed = self.doc.remove_many(ids);
        if removed.is_empty() {
            return Vec::new();
        }

        let touches_gesture = match &self.input {
            InputState::Drawing { id, .. } | InputState::Resizing { id, .. } => removed.iter().any(|s| s.id() == id),
            InputState::Moving { .. } => true,
            InputState::Idle | InputState::MarqueeSelecting { .. } => false,
        };
        if touches_gesture {
            self.input = InputState::Idle;
        }
        self.selection.clear();
        debug!(count = removed.len(), "shapes deleted");

        let mut actions = Vec::new();
        self.emit(&mut actions, true);
        actions
    }

    /// The document as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Serialize`] if serialization fails.
    pub fn document_json(&self) -> Result<String, SyncError> {
        sync::serialize(self.doc.list())
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if self.ui.locked || button != Button::Primary {
            return Vec::new();
        }

        let mut actions = Vec::new();
        let mut changed = false;
        if !self.input.is_idle() {
            // A down without a matching up: close out the old gesture first.
            changed = self.finish_gesture();
        }

        match hit::hit_test(pt, &self.doc, &self.selection) {
            Some(hit::Hit { shape_id, part: HitPart::Handle(handle) }) => {
                self.input = InputState::Resizing { id: shape_id, handle, last: pt };
            }
            Some(hit::Hit { shape_id, part: HitPart::Body }) => {
                if modifiers.multi_select() {
                    self.selection.toggle(&shape_id);
                } else if !self.selection.contains(&shape_id) {
                    self.selection.select([shape_id]);
                }
                if !self.selection.is_empty() {
                    self.input = InputState::Moving { last: pt };
                }
            }
            None => match self.ui.tool.shape_kind() {
                Some(kind) => {
                    // Cleared silently; the draw's own sync carries it.
                    self.selection.clear();
                    let style = Style::solid(&self.ui.color, self.ui.stroke_width, self.ui.opacity);
                    let shape = Shape::create(kind, new_shape_id(), pt, style);
                    let id = shape.id().to_owned();
                    if self.doc.add(shape) {
                        self.input = InputState::Drawing { id, start: pt };
                    }
                }
                None => {
                    changed |= self.selection.clear();
                    self.input = InputState::MarqueeSelecting { start: pt, current: pt };
                }
            },
        }
        debug!(state = self.input.name(), x = pt.x, y = pt.y, "pointer down");

        actions.push(Action::HideContextMenu);
        self.emit(&mut actions, changed);
        actions
    }

    pub fn on_pointer_move(&mut self, pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        if self.ui.locked {
            return Vec::new();
        }

        let changed = match &mut self.input {
            InputState::Idle => return Vec::new(),
            InputState::Drawing { id, start } => {
                let Some(shape) = self.doc.find_mut(id) else {
                    self.input = InputState::Idle;
                    return Vec::new();
                };
                shape.update_on_draw(pt, *start);
                true
            }
            InputState::Moving { last } => {
                let (dx, dy) = pt.delta_from(*last);
                *last = pt;
                if dx == 0.0 && dy == 0.0 {
                    return Vec::new();
                }
                for id in self.selection.current() {
                    if let Some(shape) = self.doc.find_mut(id) {
                        shape.update_on_move(dx, dy);
                    }
                }
                true
            }
            InputState::Resizing { id, handle, last } => {
                let Some(shape) = self.doc.find_mut(id) else {
                    self.input = InputState::Idle;
                    return Vec::new();
                };
                shape.apply_resize(*handle, pt, *last);
                *last = pt;
                true
            }
            InputState::MarqueeSelecting { current, .. } => {
                *current = pt;
                false
            }
        };

        let mut actions = Vec::new();
        self.emit(&mut actions, changed);
        actions
    }

    pub fn on_pointer_up(&mut self, pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if self.ui.locked || self.input.is_idle() {
            return Vec::new();
        }

        if let InputState::MarqueeSelecting { current, .. } = &mut self.input {
            *current = pt;
        }
        let changed = self.finish_gesture();

        let mut actions = Vec::new();
        self.emit(&mut actions, changed);
        actions
    }

    /// Right-click at canvas point `pt`. Selects the shape under the pointer
    /// and asks the host for a context menu at `menu_at` (container-relative),
    /// or clears the selection and closes the menu on empty canvas.
    pub fn on_context_menu(&mut self, pt: Point, menu_at: Point) -> Vec<Action> {
        if self.ui.locked {
            return Vec::new();
        }

        let mut actions = Vec::new();
        let hit_id = self.doc.topmost_at(pt).map(|shape| shape.id().to_owned());
        if let Some(id) = hit_id {
            if !self.selection.contains(&id) {
                self.selection.select([id.as_str()]);
            }
            self.emit(&mut actions, false);
            actions.push(Action::ShapeRightClicked { x: menu_at.x, y: menu_at.y, id });
        } else {
            let cleared = self.selection.clear();
            self.emit(&mut actions, cleared);
            actions.push(Action::HideContextMenu);
        }
        actions
    }

    // --- Keyboard input ---

    /// `Delete`/`Backspace` delete the selection; `Escape` finishes any
    /// gesture and clears the selection.
    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if self.ui.locked {
            return Vec::new();
        }

        if key.is_delete() {
            let ids = self.selection.ordered(&self.doc);
            return self.delete_shapes(&ids);
        }

        if key.is_escape() {
            let mut changed = self.finish_gesture();
            changed |= self.selection.clear();
            let mut actions = vec![Action::HideContextMenu];
            self.emit(&mut actions, changed);
            return actions;
        }

        Vec::new()
    }

    // --- Queries ---

    /// Selected ids in document order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<ShapeId> {
        self.selection.ordered(&self.doc)
    }

    /// Look up a shape by id.
    #[must_use]
    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.doc.find(id)
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.ui.locked
    }

    // --- Internals ---

    /// End the current gesture as it stands and return to `Idle`. Returns
    /// whether the host needs a fresh copy of the document.
    fn finish_gesture(&mut self) -> bool {
        match std::mem::take(&mut self.input) {
            InputState::Idle => false,
            InputState::Drawing { id, .. } => {
                if self.doc.find(&id).is_some_and(Shape::should_discard) {
                    self.doc.remove(&id);
                    debug!(%id, "discarding zero-size shape");
                } else {
                    debug!(%id, "shape drawn");
                }
                true
            }
            InputState::Moving { .. } | InputState::Resizing { .. } => true,
            InputState::MarqueeSelecting { start, current } => {
                let area = Rect::from_corners(start, current);
                let ids = self.doc.intersecting(&area);
                debug!(count = ids.len(), "marquee selection");
                if ids.is_empty() {
                    self.selection.clear()
                } else {
                    self.selection.select(ids);
                    false
                }
            }
        }
    }

    /// Push a render request and, if `changed`, the serialized document.
    fn emit(&self, actions: &mut Vec<Action>, changed: bool) {
        actions.push(Action::RenderNeeded);
        if !changed {
            return;
        }
        match self.document_json() {
            Ok(json) => actions.push(Action::DocumentChanged(json)),
            Err(e) => warn!(error = %e, "failed to serialize document"),
        }
    }
}

/// The full engine: wires `EngineCore` to a render surface and a host sink
/// and carries out the actions the core returns.
pub struct Engine<S: Surface, H: HostSink> {
    pub core: EngineCore,
    adapter: RenderAdapter,
    surface: S,
    host: H,
}

impl<S: Surface, H: HostSink> Engine<S, H> {
    /// Create an engine and paint the (empty) initial frame.
    pub fn new(surface: S, host: H, config: &EngineConfig) -> Self {
        let mut engine = Self { core: EngineCore::with_config(config), adapter: RenderAdapter::new(), surface, host };
        engine.full_render();
        engine
    }

    // --- Delegated host inputs ---

    pub fn set_tool(&mut self, name: &str) {
        let actions = self.core.set_tool(name);
        self.dispatch(actions);
    }

    pub fn set_color(&mut self, color: &str) {
        let actions = self.core.set_color(color);
        self.dispatch(actions);
    }

    pub fn set_lock(&mut self, locked: bool) {
        let actions = self.core.set_lock(locked);
        self.dispatch(actions);
    }

    /// # Errors
    ///
    /// Returns the [`SyncError`] for malformed input; the canvas is left as it was.
    pub fn replace_document(&mut self, text: &str) -> Result<(), SyncError> {
        let actions = self.core.replace_document(text)?;
        self.dispatch(actions);
        Ok(())
    }

    pub fn delete_shape(&mut self, id: &str) {
        let actions = self.core.delete_shape(id);
        self.dispatch(actions);
    }

    pub fn delete_shapes<T: AsRef<str>>(&mut self, ids: &[T]) {
        let actions = self.core.delete_shapes(ids);
        self.dispatch(actions);
    }

    /// # Errors
    ///
    /// Returns [`SyncError::Serialize`] if serialization fails.
    pub fn document_json(&self) -> Result<String, SyncError> {
        self.core.document_json()
    }

    // --- Delegated input events ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button, modifiers: Modifiers) {
        let actions = self.core.on_pointer_down(pt, button, modifiers);
        self.dispatch(actions);
    }

    pub fn on_pointer_move(&mut self, pt: Point, modifiers: Modifiers) {
        let actions = self.core.on_pointer_move(pt, modifiers);
        self.dispatch(actions);
    }

    pub fn on_pointer_up(&mut self, pt: Point, button: Button, modifiers: Modifiers) {
        let actions = self.core.on_pointer_up(pt, button, modifiers);
        self.dispatch(actions);
    }

    pub fn on_context_menu(&mut self, pt: Point, menu_at: Point) {
        let actions = self.core.on_context_menu(pt, menu_at);
        self.dispatch(actions);
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) {
        let actions = self.core.on_key_down(key, modifiers);
        self.dispatch(actions);
    }

    // --- Render ---

    /// Bring the surface up to date with the model.
    pub fn render(&mut self) {
        let ops = self.adapter.sync(&self.core.doc, &self.core.selection, &self.core.input);
        if ops.is_empty() {
            return;
        }
        for op in &ops {
            self.surface.apply(op);
        }
        self.surface.present();
    }

    /// Drop every visual and repaint from scratch.
    pub fn full_render(&mut self) {
        for op in self.adapter.rebuild(&self.core.doc, &self.core.selection, &self.core.input) {
            self.surface.apply(&op);
        }
        self.surface.present();
    }

    // --- Accessors ---

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn adapter(&self) -> &RenderAdapter {
        &self.adapter
    }

    /// Carry out actions in order: visuals first, then host notifications.
    fn dispatch(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::RenderNeeded => self.render(),
                Action::FullRenderNeeded => self.full_render(),
                Action::DocumentChanged(json) => self.host.on_document_changed(&json),
                Action::ShapeRightClicked { x, y, id } => self.host.on_shape_right_clicked(x, y, &id),
                Action::HideContextMenu => self.host.on_request_hide_context_menu(),
                Action::SetCursor(cursor) => self.host.on_cursor_changed(&cursor),
            }
        }
    }
}
