//! Shared numeric constants for the canvas crate.

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width, height or radius a resize can leave behind.
pub const MIN_EXTENT: f64 = 10.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Side length of a square resize handle, in canvas pixels.
pub const HANDLE_SIZE: f64 = 8.0;

/// Half of [`HANDLE_SIZE`]; a pointer within this distance on both axes hits the handle.
pub const HANDLE_HALF: f64 = HANDLE_SIZE / 2.0;

// ── New-shape defaults ──────────────────────────────────────────

/// Draw color used until the host picks one.
pub const DEFAULT_COLOR: &str = "#0000ff";

/// Stroke width given to freshly drawn shapes.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Opacity given to freshly drawn shapes.
pub const DEFAULT_OPACITY: f64 = 0.8;

/// Prefix for generated shape ids.
pub const SHAPE_ID_PREFIX: &str = "shape-";
