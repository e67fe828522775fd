//! Shape model: the closed set of shape kinds and the behavior each kind
//! supplies to the interaction controller.
//!
//! Every per-kind decision lives in a `match` on [`Geometry`] inside this
//! module. Adding a kind means adding a [`ShapeKind`] variant, a [`Geometry`]
//! variant and the arms the compiler then asks for; the controller in
//! [`crate::engine`] only ever calls the methods below.
//!
//! A [`Shape`] is a plain value. It carries no link to whatever draws it;
//! the render adapter keeps that association in its own side table.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_OPACITY, DEFAULT_STROKE_WIDTH, MIN_EXTENT, SHAPE_ID_PREFIX};
use crate::geometry::{Point, Rect, circle_cardinals, circle_intersects_rect};

/// Unique identifier for a shape.
pub type ShapeId = String;

/// Generate a fresh, globally unique shape id.
#[must_use]
pub fn new_shape_id() -> ShapeId {
    format!("{SHAPE_ID_PREFIX}{}", Uuid::new_v4().simple())
}

/// The kind of a shape. Serialized as its lowercase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    Rect,
    /// Circle given by center and radius.
    Circle,
}

impl ShapeKind {
    /// Every registered kind.
    pub const ALL: [ShapeKind; 2] = [ShapeKind::Rect, ShapeKind::Circle];

    /// Tag used on the wire and as the tool name.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Circle => "circle",
        }
    }

    /// Look a kind up by tag, ignoring ASCII case. Unknown tags are `None`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL.into_iter().find(|k| k.tag().eq_ignore_ascii_case(tag))
    }
}

/// Paint attributes shared by every kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Fill color as a CSS color string.
    pub fill: String,
    /// Stroke color as a CSS color string.
    pub stroke: String,
    /// Stroke width in canvas pixels, never negative.
    pub stroke_width: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Style {
    /// A style that fills and strokes with the same color. Numbers are pulled
    /// into range; non-finite ones fall back to the defaults.
    #[must_use]
    pub fn solid(color: &str, stroke_width: f64, opacity: f64) -> Self {
        Self {
            fill: color.to_owned(),
            stroke: color.to_owned(),
            stroke_width: if stroke_width.is_finite() { stroke_width.max(0.0) } else { DEFAULT_STROKE_WIDTH },
            opacity: if opacity.is_finite() { opacity.clamp(0.0, 1.0) } else { DEFAULT_OPACITY },
        }
    }
}

/// Kind-specific geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Top-left corner plus extent.
    Rect { x: f64, y: f64, width: f64, height: f64 },
    /// Center plus radius.
    Circle { cx: f64, cy: f64, r: f64 },
}

/// A shape in the document.
///
/// `id` and kind are fixed at construction; geometry and style change
/// through the methods below.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    geometry: Geometry,
    /// Paint attributes.
    pub style: Style,
}

impl Shape {
    /// A new shape of `kind` with zero extent anchored at `origin`.
    #[must_use]
    pub fn create(kind: ShapeKind, id: ShapeId, origin: Point, style: Style) -> Self {
        let geometry = match kind {
            ShapeKind::Rect => Geometry::Rect { x: origin.x, y: origin.y, width: 0.0, height: 0.0 },
            ShapeKind::Circle => Geometry::Circle { cx: origin.x, cy: origin.y, r: 0.0 },
        };
        Self { id, geometry, style }
    }

    /// A rectangle covering `rect`.
    #[must_use]
    pub fn rect(id: impl Into<ShapeId>, rect: Rect, style: Style) -> Self {
        let mut shape = Self {
            id: id.into(),
            geometry: Geometry::Rect { x: rect.x, y: rect.y, width: rect.width, height: rect.height },
            style,
        };
        shape.normalize();
        shape
    }

    /// A circle of radius `r` around `center`.
    #[must_use]
    pub fn circle(id: impl Into<ShapeId>, center: Point, r: f64, style: Style) -> Self {
        let mut shape = Self { id: id.into(), geometry: Geometry::Circle { cx: center.x, cy: center.y, r }, style };
        shape.normalize();
        shape
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self.geometry {
            Geometry::Rect { .. } => ShapeKind::Rect,
            Geometry::Circle { .. } => ShapeKind::Circle,
        }
    }

    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Recolor fill and stroke.
    pub fn set_color(&mut self, color: &str) {
        color.clone_into(&mut self.style.fill);
        color.clone_into(&mut self.style.stroke);
    }

    /// Resize handle positions, indexed as `apply_resize` expects them.
    ///
    /// Rectangles: top-left, top-right, bottom-left, bottom-right.
    /// Circles: north, east, south, west.
    #[must_use]
    pub fn resize_handles(&self) -> [Point; 4] {
        match self.geometry {
            Geometry::Rect { x, y, width, height } => Rect::new(x, y, width, height).corners(),
            Geometry::Circle { cx, cy, r } => circle_cardinals(Point::new(cx, cy), r),
        }
    }

    /// Drag resize handle `handle` from `start` to `pointer`, then clamp the
    /// extent to [`MIN_EXTENT`] keeping the edge opposite the handle fixed.
    ///
    /// Circles ignore `handle` and `start`: the radius becomes the distance
    /// from the center to `pointer`. An out-of-range rectangle handle is a no-op.
    pub fn apply_resize(&mut self, handle: usize, pointer: Point, start: Point) {
        match &mut self.geometry {
            Geometry::Rect { x, y, width, height } => {
                let (dx, dy) = pointer.delta_from(start);
                match handle {
                    0 => {
                        *x += dx;
                        *y += dy;
                        *width -= dx;
                        *height -= dy;
                    }
                    1 => {
                        *y += dy;
                        *width += dx;
                        *height -= dy;
                    }
                    2 => {
                        *x += dx;
                        *width -= dx;
                        *height += dy;
                    }
                    3 => {
                        *width += dx;
                        *height += dy;
                    }
                    _ => return,
                }

                let moves_left_edge = matches!(handle, 0 | 2);
                let moves_top_edge = matches!(handle, 0 | 1);
                if *width < MIN_EXTENT {
                    if moves_left_edge {
                        *x += *width - MIN_EXTENT;
                    }
                    *width = MIN_EXTENT;
                }
                if *height < MIN_EXTENT {
                    if moves_top_edge {
                        *y += *height - MIN_EXTENT;
                    }
                    *height = MIN_EXTENT;
                }
            }
            Geometry::Circle { cx, cy, r } => {
                *r = Point::new(*cx, *cy).distance_to(pointer).max(MIN_EXTENT);
            }
        }
    }

    /// Follow the pointer while the shape is first being dragged out from `start`.
    pub fn update_on_draw(&mut self, current: Point, start: Point) {
        match &mut self.geometry {
            Geometry::Rect { x, y, width, height } => {
                let span = Rect::from_corners(start, current);
                *x = span.x;
                *y = span.y;
                *width = span.width;
                *height = span.height;
            }
            Geometry::Circle { cx, cy, r } => {
                *cx = start.x;
                *cy = start.y;
                *r = start.distance_to(current);
            }
        }
    }

    /// Translate by `(dx, dy)`.
    pub fn update_on_move(&mut self, dx: f64, dy: f64) {
        match &mut self.geometry {
            Geometry::Rect { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Geometry::Circle { cx, cy, .. } => {
                *cx += dx;
                *cy += dy;
            }
        }
    }

    /// True for a zero-extent shape, e.g. a click that never dragged.
    #[must_use]
    pub fn should_discard(&self) -> bool {
        match self.geometry {
            Geometry::Rect { width, height, .. } => width == 0.0 || height == 0.0,
            Geometry::Circle { r, .. } => r == 0.0,
        }
    }

    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        match self.geometry {
            Geometry::Rect { x, y, width, height } => Rect::new(x, y, width, height),
            Geometry::Circle { cx, cy, r } => Rect::new(cx - r, cy - r, r * 2.0, r * 2.0),
        }
    }

    /// Whether `p` falls on the shape body. Edges count.
    #[must_use]
    pub fn hit_test(&self, p: Point) -> bool {
        match self.geometry {
            Geometry::Rect { .. } => self.bounding_box().contains(p),
            Geometry::Circle { cx, cy, r } => Point::new(cx, cy).distance_to(p) <= r,
        }
    }

    /// Whether the shape overlaps a marquee box.
    #[must_use]
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        match self.geometry {
            Geometry::Rect { .. } => self.bounding_box().intersects(rect),
            Geometry::Circle { cx, cy, r } => circle_intersects_rect(Point::new(cx, cy), r, rect),
        }
    }

    /// Flip negative extents so the stored form is never negative, and pull
    /// style numbers back into range.
    pub fn normalize(&mut self) {
        match &mut self.geometry {
            Geometry::Rect { x, y, width, height } => {
                if *width < 0.0 {
                    *x += *width;
                    *width = -*width;
                }
                if *height < 0.0 {
                    *y += *height;
                    *height = -*height;
                }
            }
            Geometry::Circle { r, .. } => *r = r.abs(),
        }
        self.style.stroke_width = self.style.stroke_width.max(0.0);
        self.style.opacity = self.style.opacity.clamp(0.0, 1.0);
    }
}
