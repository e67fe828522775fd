//! Browser binding: exports the engine to JavaScript, paints with Canvas2D
//! and reports back to the page through registered callbacks.
//!
//! This module is the only place that touches [`web_sys`]. Everything below
//! it is plain Rust and runs the same under `cargo test`.

#[cfg(all(test, feature = "console"))]
#[path = "web_test.rs"]
mod web_test;

use std::f64::consts::PI;

use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::EngineConfig;
use crate::consts::{HANDLE_HALF, HANDLE_SIZE};
use crate::engine::Engine;
use crate::geometry::{Point, Rect};
use crate::host::HostSink;
use crate::input::{Button, Key, Modifiers};
use crate::render::{Overlay, RenderOp, RetainedScene, Surface};
use crate::shape::{Geometry, Shape};

/// Selection chrome color.
const SELECTION_COLOR: &str = "#1E90FF";
/// Marquee fill.
const MARQUEE_FILL: &str = "rgba(30, 144, 255, 0.12)";
/// Dash segment length for selection and marquee outlines.
const DASH_PX: f64 = 4.0;

// Modifier bits accepted by the pointer entry points.
const MOD_SHIFT: u8 = 1;
const MOD_CTRL: u8 = 1 << 1;
const MOD_ALT: u8 = 1 << 2;
const MOD_META: u8 = 1 << 3;

// =============================================================
// Surface
// =============================================================

/// Repaints the whole canvas from a retained scene after each batch.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    scene: RetainedScene,
}

impl CanvasSurface {
    /// # Errors
    ///
    /// Returns `Err` when the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx, scene: RetainedScene::default() })
    }

    fn paint(&self) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_global_alpha(1.0);
        ctx.clear_rect(0.0, 0.0, f64::from(self.canvas.width()), f64::from(self.canvas.height()));

        for shape in self.scene.shapes() {
            draw_shape(ctx, shape)?;
        }
        draw_overlay(ctx, self.scene.overlay())
    }
}

impl Surface for CanvasSurface {
    fn apply(&mut self, op: &RenderOp) {
        self.scene.apply(op);
    }

    fn present(&mut self) {
        if let Err(err) = self.paint() {
            warn!(?err, "canvas paint failed");
        }
    }
}

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    let style = &shape.style;
    ctx.save();
    ctx.set_global_alpha(style.opacity);
    ctx.set_fill_style_str(&style.fill);
    ctx.set_stroke_style_str(&style.stroke);
    ctx.set_line_width(style.stroke_width);

    match shape.geometry() {
        Geometry::Rect { x, y, width, height } => {
            ctx.fill_rect(x, y, width, height);
            if style.stroke_width > 0.0 {
                ctx.stroke_rect(x, y, width, height);
            }
        }
        Geometry::Circle { cx, cy, r } => {
            ctx.begin_path();
            ctx.arc(cx, cy, r, 0.0, 2.0 * PI)?;
            ctx.fill();
            if style.stroke_width > 0.0 {
                ctx.stroke();
            }
        }
    }

    ctx.restore();
    Ok(())
}

fn draw_overlay(ctx: &CanvasRenderingContext2d, overlay: &Overlay) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_line_width(1.0);
    ctx.set_stroke_style_str(SELECTION_COLOR);

    if let Some(b) = overlay.selection_box {
        with_dash(ctx, |ctx| ctx.stroke_rect(b.x, b.y, b.width, b.height))?;
    }

    ctx.set_fill_style_str("#fff");
    for h in &overlay.handles {
        ctx.fill_rect(h.x - HANDLE_HALF, h.y - HANDLE_HALF, HANDLE_SIZE, HANDLE_SIZE);
        ctx.stroke_rect(h.x - HANDLE_HALF, h.y - HANDLE_HALF, HANDLE_SIZE, HANDLE_SIZE);
    }

    if let Some(m) = overlay.marquee {
        draw_marquee(ctx, m)?;
    }

    ctx.restore();
    Ok(())
}

fn draw_marquee(ctx: &CanvasRenderingContext2d, m: Rect) -> Result<(), JsValue> {
    ctx.set_fill_style_str(MARQUEE_FILL);
    ctx.fill_rect(m.x, m.y, m.width, m.height);
    with_dash(ctx, |ctx| ctx.stroke_rect(m.x, m.y, m.width, m.height))
}

fn with_dash(ctx: &CanvasRenderingContext2d, draw: impl FnOnce(&CanvasRenderingContext2d)) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    dash_array.push(&DASH_PX.into());
    dash_array.push(&DASH_PX.into());
    ctx.set_line_dash(&dash_array)?;
    draw(ctx);
    ctx.set_line_dash(&js_sys::Array::new())?;
    Ok(())
}

// =============================================================
// Host
// =============================================================

/// Forwards notifications to JavaScript callbacks. Unset callbacks are skipped.
pub struct JsHost {
    canvas: HtmlCanvasElement,
    document_changed: Option<js_sys::Function>,
    shape_right_clicked: Option<js_sys::Function>,
    hide_context_menu: Option<js_sys::Function>,
}

impl JsHost {
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, document_changed: None, shape_right_clicked: None, hide_context_menu: None }
    }
}

fn report(result: Result<JsValue, JsValue>, callback: &'static str) {
    if let Err(err) = result {
        warn!(callback, ?err, "host callback threw");
    }
}

impl HostSink for JsHost {
    fn on_document_changed(&mut self, json: &str) {
        if let Some(f) = &self.document_changed {
            report(f.call1(&JsValue::NULL, &JsValue::from_str(json)), "documentChanged");
        }
    }

    fn on_shape_right_clicked(&mut self, x: f64, y: f64, id: &str) {
        if let Some(f) = &self.shape_right_clicked {
            let result = f.call3(&JsValue::NULL, &JsValue::from_f64(x), &JsValue::from_f64(y), &JsValue::from_str(id));
            report(result, "shapeRightClicked");
        }
    }

    fn on_request_hide_context_menu(&mut self) {
        if let Some(f) = &self.hide_context_menu {
            report(f.call0(&JsValue::NULL), "hideContextMenu");
        }
    }

    fn on_cursor_changed(&mut self, cursor: &str) {
        if let Err(err) = self.canvas.style().set_property("cursor", cursor) {
            warn!(?err, "failed to set cursor");
        }
    }
}

// =============================================================
// Exported engine
// =============================================================

/// Send `tracing` events and panics to the browser console. `tracing`
/// forwards to the `log` facade while no subscriber is set, and
/// `console_log` is that facade's backend. Runs once per page.
#[cfg(feature = "console")]
fn install_console() {
    static INSTALL: std::sync::Once = std::sync::Once::new();
    INSTALL.call_once(|| {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            warn!(%err, "console logger already installed");
        }
    });
}

#[cfg(not(feature = "console"))]
fn install_console() {}

fn modifiers_from_bits(bits: u8) -> Modifiers {
    Modifiers {
        shift: bits & MOD_SHIFT != 0,
        ctrl: bits & MOD_CTRL != 0,
        alt: bits & MOD_ALT != 0,
        meta: bits & MOD_META != 0,
    }
}

/// The shape editor as seen from JavaScript.
#[wasm_bindgen]
pub struct WebEngine {
    inner: Engine<CanvasSurface, JsHost>,
}

#[wasm_bindgen]
impl WebEngine {
    /// Bind an engine to `canvas`. `config` is an optional JSON object with
    /// any of `tool`, `color`, `strokeWidth`, `opacity`.
    ///
    /// # Errors
    ///
    /// Fails when the config is malformed or the canvas has no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config: Option<String>) -> Result<WebEngine, JsValue> {
        install_console();
        let config = match config.as_deref() {
            Some(text) => EngineConfig::from_json(text).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => EngineConfig::default(),
        };
        let surface = CanvasSurface::new(canvas.clone())?;
        let host = JsHost::new(canvas);
        Ok(Self { inner: Engine::new(surface, host, &config) })
    }

    // --- Callbacks ---

    #[wasm_bindgen(js_name = onDocumentChanged)]
    pub fn on_document_changed(&mut self, callback: js_sys::Function) {
        self.inner.host_mut().document_changed = Some(callback);
    }

    #[wasm_bindgen(js_name = onShapeRightClicked)]
    pub fn on_shape_right_clicked(&mut self, callback: js_sys::Function) {
        self.inner.host_mut().shape_right_clicked = Some(callback);
    }

    #[wasm_bindgen(js_name = onRequestHideContextMenu)]
    pub fn on_request_hide_context_menu(&mut self, callback: js_sys::Function) {
        self.inner.host_mut().hide_context_menu = Some(callback);
    }

    // --- Host inputs ---

    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&mut self, name: &str) {
        self.inner.set_tool(name);
    }

    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, color: &str) {
        self.inner.set_color(color);
    }

    #[wasm_bindgen(js_name = setLock)]
    pub fn set_lock(&mut self, locked: bool) {
        self.inner.set_lock(locked);
    }

    /// # Errors
    ///
    /// Rejects malformed JSON; the canvas is left unchanged.
    #[wasm_bindgen(js_name = replaceDocument)]
    pub fn replace_document(&mut self, text: &str) -> Result<(), JsValue> {
        self.inner.replace_document(text).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = deleteShape)]
    pub fn delete_shape(&mut self, id: &str) {
        self.inner.delete_shape(id);
    }

    #[wasm_bindgen(js_name = deleteShapes)]
    pub fn delete_shapes(&mut self, ids: Vec<String>) {
        self.inner.delete_shapes(&ids);
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    #[wasm_bindgen(js_name = getDocument)]
    pub fn get_document(&self) -> Result<String, JsValue> {
        self.inner.document_json().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    // --- DOM events ---

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16, modifiers: u8) {
        self.inner.on_pointer_down(Point::new(x, y), Button::from_dom(button), modifiers_from_bits(modifiers));
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64, modifiers: u8) {
        self.inner.on_pointer_move(Point::new(x, y), modifiers_from_bits(modifiers));
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64, button: i16, modifiers: u8) {
        self.inner.on_pointer_up(Point::new(x, y), Button::from_dom(button), modifiers_from_bits(modifiers));
    }

    /// `x`/`y` are canvas coordinates; `menu_x`/`menu_y` are relative to the
    /// container the host places its menu in.
    #[wasm_bindgen(js_name = contextMenu)]
    pub fn context_menu(&mut self, x: f64, y: f64, menu_x: f64, menu_y: f64) {
        self.inner.on_context_menu(Point::new(x, y), Point::new(menu_x, menu_y));
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: String, modifiers: u8) {
        self.inner.on_key_down(&Key(key), modifiers_from_bits(modifiers));
    }

    /// Repaint everything, e.g. after the canvas was resized.
    pub fn repaint(&mut self) {
        self.inner.full_render();
    }
}
