//! Event scripts: one JSON object per line, each naming an `event`.
//!
//! ```text
//! {"event":"set_tool","tool":"circle"}
//! {"event":"pointer_down","x":40,"y":40}
//! {"event":"pointer_move","x":70,"y":40}
//! {"event":"pointer_up","x":70,"y":40}
//! {"event":"context_menu","x":50,"y":40,"menu_x":70,"menu_y":90}
//! {"event":"key","key":"Delete"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use canvas::engine::Engine;
use canvas::geometry::Point;
use canvas::host::HostSink;
use canvas::input::{Button, Key, Modifiers};
use canvas::render::Surface;
use canvas::sync::SyncError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
#[error("script line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Modifier keys held during an event. Omitted keys are up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeldKeys {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl From<HeldKeys> for Modifiers {
    fn from(keys: HeldKeys) -> Self {
        Self { shift: keys.shift, ctrl: keys.ctrl, alt: keys.alt, meta: keys.meta }
    }
}

/// One scripted host or DOM event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown {
        x: f64,
        y: f64,
        /// DOM button code; 0 is primary.
        #[serde(default)]
        button: i16,
        #[serde(default)]
        modifiers: HeldKeys,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: HeldKeys,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: i16,
        #[serde(default)]
        modifiers: HeldKeys,
    },
    /// `menu_x`/`menu_y` place the menu in container coordinates; they
    /// default to the canvas point.
    ContextMenu {
        x: f64,
        y: f64,
        #[serde(default)]
        menu_x: Option<f64>,
        #[serde(default)]
        menu_y: Option<f64>,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: HeldKeys,
    },
    SetTool {
        tool: String,
    },
    SetColor {
        color: String,
    },
    SetLock {
        locked: bool,
    },
    /// `document` is either the JSON text as a string or the shape array itself.
    ReplaceDocument {
        document: Value,
    },
    Delete {
        ids: Vec<String>,
    },
}

impl ScriptEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::ContextMenu { .. } => "context_menu",
            Self::Key { .. } => "key",
            Self::SetTool { .. } => "set_tool",
            Self::SetColor { .. } => "set_color",
            Self::SetLock { .. } => "set_lock",
            Self::ReplaceDocument { .. } => "replace_document",
            Self::Delete { .. } => "delete",
        }
    }
}

/// A parsed event with the line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub event: ScriptEvent,
}

/// Parse a whole script.
///
/// # Errors
///
/// Fails on the first line that is not a known event.
pub fn parse(text: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut events = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line = index + 1;
        let event = serde_json::from_str(trimmed).map_err(|source| ScriptError { line, source })?;
        events.push(ScriptLine { line, event });
    }
    Ok(events)
}

/// Feed one event to the engine.
///
/// # Errors
///
/// Only `replace_document` can fail, when its document is rejected.
pub fn apply<S: Surface, H: HostSink>(engine: &mut Engine<S, H>, event: &ScriptEvent) -> Result<(), SyncError> {
    match event {
        ScriptEvent::PointerDown { x, y, button, modifiers } => {
            engine.on_pointer_down(Point::new(*x, *y), Button::from_dom(*button), (*modifiers).into());
        }
        ScriptEvent::PointerMove { x, y, modifiers } => {
            engine.on_pointer_move(Point::new(*x, *y), (*modifiers).into());
        }
        ScriptEvent::PointerUp { x, y, button, modifiers } => {
            engine.on_pointer_up(Point::new(*x, *y), Button::from_dom(*button), (*modifiers).into());
        }
        ScriptEvent::ContextMenu { x, y, menu_x, menu_y } => {
            let menu_at = Point::new(menu_x.unwrap_or(*x), menu_y.unwrap_or(*y));
            engine.on_context_menu(Point::new(*x, *y), menu_at);
        }
        ScriptEvent::Key { key, modifiers } => engine.on_key_down(&Key(key.clone()), (*modifiers).into()),
        ScriptEvent::SetTool { tool } => engine.set_tool(tool),
        ScriptEvent::SetColor { color } => engine.set_color(color),
        ScriptEvent::SetLock { locked } => engine.set_lock(*locked),
        ScriptEvent::ReplaceDocument { document } => match document {
            Value::String(text) => engine.replace_document(text)?,
            other => engine.replace_document(&other.to_string())?,
        },
        ScriptEvent::Delete { ids } => engine.delete_shapes(ids),
    }
    Ok(())
}
