//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the active gesture being tracked between
//! pointer-down and pointer-up, carrying the scratch data needed to compute
//! incremental deltas.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::{Point, Rect};
use crate::shape::{ShapeId, ShapeKind};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Pointer / selection tool.
    Select,
    /// Draw a new shape of the given kind.
    Shape(ShapeKind),
}

impl Default for Tool {
    fn default() -> Self {
        Self::Shape(ShapeKind::Rect)
    }
}

impl Tool {
    /// Parse a tool name: `"select"` or a registered shape tag, ignoring
    /// ASCII case. Unrecognized names are `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("select") {
            return Some(Self::Select);
        }
        ShapeKind::from_tag(name).map(Self::Shape)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Shape(kind) => kind.tag(),
        }
    }

    /// The kind this tool draws, if it is a drawing tool.
    #[must_use]
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Self::Select => None,
            Self::Shape(kind) => Some(kind),
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether the gesture should toggle membership instead of replacing the selection.
    #[must_use]
    pub fn multi_select(self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code. Unknown codes map to `Middle`
    /// so they never start a gesture.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            0 => Self::Primary,
            2 => Self::Secondary,
            _ => Self::Middle,
        }
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key deletes the current selection.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        matches!(self.0.as_str(), "Escape" | "Esc")
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active drawing tool.
    pub tool: Tool,
    /// Color applied to new shapes.
    pub color: String,
    /// Stroke width applied to new shapes.
    pub stroke_width: f64,
    /// Opacity applied to new shapes.
    pub opacity: f64,
    /// While set, pointer and keyboard input is ignored.
    pub locked: bool,
}

/// Internal state for the input state machine.
///
/// Each active variant carries the gesture context needed to compute deltas.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A new shape is being dragged out from `start`.
    Drawing {
        /// Id of the provisional shape already in the document.
        id: ShapeId,
        /// Pointer position at pointer-down.
        start: Point,
    },
    /// Every selected shape follows the pointer.
    Moving {
        /// Pointer position at the previous sample.
        last: Point,
    },
    /// A handle of the single selected shape is being dragged.
    Resizing {
        id: ShapeId,
        /// Handle index as ordered by `resize_handles`.
        handle: usize,
        /// Pointer position at the previous sample.
        last: Point,
    },
    /// A selection rectangle spans `start` to `current`.
    MarqueeSelecting { start: Point, current: Point },
}

impl InputState {
    /// Short state name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Drawing { .. } => "drawing",
            Self::Moving { .. } => "moving",
            Self::Resizing { .. } => "resizing",
            Self::MarqueeSelecting { .. } => "marquee",
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The marquee box, normalized, while one is being dragged.
    #[must_use]
    pub fn marquee(&self) -> Option<Rect> {
        match self {
            Self::MarqueeSelecting { start, current } => Some(Rect::from_corners(*start, *current)),
            _ => None,
        }
    }
}
