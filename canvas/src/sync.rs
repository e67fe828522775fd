//! Sync bridge: the JSON form of the document exchanged with the host.
//!
//! The wire form is an array of flat shape records:
//!
//! ```json
//! [
//!   {"id":"shape-1","type":"rect","fill":"#0000ff","stroke":"#0000ff",
//!    "strokeWidth":2.0,"opacity":0.8,"x":10.0,"y":10.0,"width":30.0,"height":20.0},
//!   {"id":"shape-2","type":"circle","fill":"red","stroke":"red",
//!    "strokeWidth":2.0,"opacity":1.0,"cx":50.0,"cy":50.0,"r":10.0}
//! ]
//! ```
//!
//! Output always uses the names above. Input matches field names without
//! regard to ASCII case and is lenient per record: a record that cannot be
//! used is skipped, never fatal. Only a malformed or non-array root fails.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::consts::{DEFAULT_COLOR, DEFAULT_OPACITY, DEFAULT_STROKE_WIDTH};
use crate::geometry::{Point, Rect};
use crate::shape::{Geometry, Shape, ShapeKind, Style, new_shape_id};

/// Error returned by [`serialize`] and [`deserialize`].
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The text is not valid JSON.
    #[error("failed to parse document: {0}")]
    Parse(#[source] serde_json::Error),
    /// The JSON root is something other than an array.
    #[error("document root must be an array, found {0}")]
    NotAnArray(&'static str),
    /// The document could not be written as JSON.
    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Outcome of decoding a document, with a count of records left out.
#[derive(Debug, Default)]
pub struct Decoded {
    pub shapes: Vec<Shape>,
    pub skipped: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShapeRecord<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: ShapeKind,
    fill: &'a str,
    stroke: &'a str,
    stroke_width: f64,
    opacity: f64,
    #[serde(flatten)]
    geometry: GeometryRecord,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeometryRecord {
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
}

impl<'a> From<&'a Shape> for ShapeRecord<'a> {
    fn from(shape: &'a Shape) -> Self {
        let geometry = match shape.geometry() {
            Geometry::Rect { x, y, width, height } => GeometryRecord::Rect { x, y, width, height },
            Geometry::Circle { cx, cy, r } => GeometryRecord::Circle { cx, cy, r },
        };
        Self {
            id: shape.id(),
            kind: shape.kind(),
            fill: &shape.style.fill,
            stroke: &shape.style.stroke,
            stroke_width: shape.style.stroke_width,
            opacity: shape.style.opacity,
            geometry,
        }
    }
}

/// Write shapes, in order, as a JSON array.
///
/// # Errors
///
/// Returns [`SyncError::Serialize`] if `serde_json` rejects the output.
pub fn serialize(shapes: &[Shape]) -> Result<String, SyncError> {
    let records: Vec<ShapeRecord<'_>> = shapes.iter().map(ShapeRecord::from).collect();
    serde_json::to_string(&records).map_err(SyncError::Serialize)
}

/// Whether two document texts hold the same records, ignoring layout, key
/// order and number spelling (`10` matches `10.0`). Unparseable text never
/// matches.
#[must_use]
pub fn same_document(a: &str, b: &str) -> bool {
    match (serde_json::from_str::<Value>(a), serde_json::from_str::<Value>(b)) {
        (Ok(a), Ok(b)) => same_value(&a, &b),
        _ => false,
    }
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len() && xs.iter().all(|(key, x)| ys.get(key).is_some_and(|y| same_value(x, y)))
        }
        _ => a == b,
    }
}

/// Read shapes from JSON text. Blank text is an empty document.
///
/// # Errors
///
/// Returns [`SyncError::Parse`] for invalid JSON and [`SyncError::NotAnArray`]
/// when the root is not an array.
pub fn deserialize(text: &str) -> Result<Vec<Shape>, SyncError> {
    decode(text).map(|decoded| decoded.shapes)
}

/// Like [`deserialize`], also reporting how many records were skipped.
///
/// # Errors
///
/// Same as [`deserialize`].
pub fn decode(text: &str) -> Result<Decoded, SyncError> {
    if text.trim().is_empty() {
        return Ok(Decoded::default());
    }

    let root: Value = serde_json::from_str(text).map_err(SyncError::Parse)?;
    let Value::Array(items) = root else {
        return Err(SyncError::NotAnArray(json_type_name(&root)));
    };

    let mut decoded = Decoded { shapes: Vec::with_capacity(items.len()), skipped: 0 };
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::Object(fields) => match decode_record(fields) {
                Some(shape) => decoded.shapes.push(shape),
                None => {
                    debug!(index, "skipping unusable shape record");
                    decoded.skipped += 1;
                }
            },
            other => {
                debug!(index, found = json_type_name(other), "skipping non-object shape record");
                decoded.skipped += 1;
            }
        }
    }
    Ok(decoded)
}

// =============================================================
// Record decoding
// =============================================================

/// Field lookup keyed by lowercased name. The first spelling wins when a
/// record repeats a name in different case.
struct Fields<'a>(HashMap<String, &'a Value>);

impl<'a> Fields<'a> {
    fn new(map: &'a Map<String, Value>) -> Self {
        let mut fields = HashMap::with_capacity(map.len());
        for (key, value) in map {
            fields.entry(key.to_ascii_lowercase()).or_insert(value);
        }
        Self(fields)
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.0.get(name).copied().filter(|v| !v.is_null())
    }

    fn str(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }

    /// `Some(default)` when absent, `None` when present but not a finite number.
    fn number_or(&self, name: &str, default: f64) -> Option<f64> {
        match self.get(name) {
            None => Some(default),
            Some(value) => value.as_f64().filter(|n| n.is_finite()),
        }
    }
}

fn decode_record(map: &Map<String, Value>) -> Option<Shape> {
    let fields = Fields::new(map);

    let tag = fields.str("type").or_else(|| fields.str("kind"))?;
    let Some(kind) = ShapeKind::from_tag(tag) else {
        debug!(tag, "unknown shape kind");
        return None;
    };

    let id = match fields.str("id").map(str::trim) {
        Some(id) if !id.is_empty() => id.to_owned(),
        _ => new_shape_id(),
    };

    // Range clamping happens in the shape constructors.
    let style = Style {
        fill: fields.str("fill").unwrap_or(DEFAULT_COLOR).to_owned(),
        stroke: fields.str("stroke").unwrap_or(DEFAULT_COLOR).to_owned(),
        stroke_width: fields.number_or("strokewidth", DEFAULT_STROKE_WIDTH)?,
        opacity: fields.number_or("opacity", DEFAULT_OPACITY)?,
    };

    let shape = match kind {
        ShapeKind::Rect => {
            let rect = Rect::new(
                fields.number_or("x", 0.0)?,
                fields.number_or("y", 0.0)?,
                fields.number_or("width", 0.0)?,
                fields.number_or("height", 0.0)?,
            );
            Shape::rect(id, rect, style)
        }
        ShapeKind::Circle => {
            let center = Point::new(fields.number_or("cx", 0.0)?, fields.number_or("cy", 0.0)?);
            Shape::circle(id, center, fields.number_or("r", 0.0)?, style)
        }
    };
    Some(shape)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
