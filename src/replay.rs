//! Headless host: drives an engine from a script, logging what a page
//! would have seen.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use canvas::config::EngineConfig;
use canvas::engine::Engine;
use canvas::host::HostSink;
use canvas::render::{RenderOp, RetainedScene, Surface};
use canvas::sync::SyncError;
use tracing::{debug, info, warn};

use crate::script::{self, ScriptLine};

/// A notification delivered to the host, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    DocumentChanged(String),
    ShapeRightClicked { x: f64, y: f64, id: String },
    HideContextMenu,
    Cursor(String),
}

/// Records and logs every notification.
#[derive(Debug, Default)]
pub struct LogHost {
    pub notifications: Vec<Notification>,
}

impl HostSink for LogHost {
    fn on_document_changed(&mut self, json: &str) {
        info!(bytes = json.len(), "document changed");
        self.notifications.push(Notification::DocumentChanged(json.to_owned()));
    }

    fn on_shape_right_clicked(&mut self, x: f64, y: f64, id: &str) {
        info!(%id, x, y, "shape right-clicked");
        self.notifications.push(Notification::ShapeRightClicked { x, y, id: id.to_owned() });
    }

    fn on_request_hide_context_menu(&mut self) {
        debug!("hide context menu");
        self.notifications.push(Notification::HideContextMenu);
    }

    fn on_cursor_changed(&mut self, cursor: &str) {
        debug!(%cursor, "cursor changed");
        self.notifications.push(Notification::Cursor(cursor.to_owned()));
    }
}

/// Keeps a retained scene and traces each op.
#[derive(Default)]
pub struct TraceSurface {
    pub scene: RetainedScene,
    pub ops: usize,
    pub frames: usize,
}

impl Surface for TraceSurface {
    fn apply(&mut self, op: &RenderOp) {
        match op {
            RenderOp::Clear => debug!("clear"),
            RenderOp::Create { handle, shape } => debug!(handle = handle.0, id = %shape.id(), "create visual"),
            RenderOp::Update { handle, shape } => debug!(handle = handle.0, id = %shape.id(), "update visual"),
            RenderOp::Remove { handle } => debug!(handle = handle.0, "remove visual"),
            RenderOp::Overlay(overlay) => debug!(handles = overlay.handles.len(), marquee = overlay.marquee.is_some(), "overlay"),
        }
        self.scene.apply(op);
        self.ops += 1;
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}

/// What a replay ended with.
#[derive(Debug)]
pub struct Outcome {
    /// Final document JSON.
    pub document: String,
    pub notifications: Vec<Notification>,
    /// Events whose document was rejected.
    pub rejected: usize,
    /// Visuals left on the surface.
    pub visuals: usize,
}

/// Run `events` against a fresh engine, optionally seeded with `initial`.
///
/// A rejected `replace_document` event is logged and counted; the replay
/// goes on, as a page would.
///
/// # Errors
///
/// Fails if the initial document is rejected or the final document cannot
/// be serialized.
pub fn run(config: &EngineConfig, initial: Option<&str>, events: &[ScriptLine]) -> Result<Outcome, SyncError> {
    let mut engine = Engine::new(TraceSurface::default(), LogHost::default(), config);
    if let Some(text) = initial {
        engine.replace_document(text)?;
        info!(shapes = engine.core.doc.len(), "initial document loaded");
    }

    let mut rejected = 0;
    for ScriptLine { line, event } in events {
        debug!(line, event = event.name(), "apply");
        if let Err(err) = script::apply(&mut engine, event) {
            warn!(line, %err, "event rejected");
            rejected += 1;
        }
    }

    let document = engine.document_json()?;
    info!(
        shapes = engine.core.doc.len(),
        ops = engine.surface().ops,
        frames = engine.surface().frames,
        "replay finished"
    );
    Ok(Outcome {
        document,
        notifications: std::mem::take(&mut engine.host_mut().notifications),
        rejected,
        visuals: engine.surface().scene.len(),
    })
}
