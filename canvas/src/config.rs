//! Engine start-up configuration: the tool and paint applied before the host
//! sends its first `set_tool` / `set_color`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{DEFAULT_COLOR, DEFAULT_OPACITY, DEFAULT_STROKE_WIDTH};
use crate::input::{Tool, UiState};

/// Initial engine settings. Every field has a default, so any subset can be
/// given in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Tool name: `"select"` or a shape tag.
    #[serde(default = "default_tool")]
    pub tool: String,
    /// CSS color for fill and stroke of new shapes.
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            color: default_color(),
            stroke_width: default_stroke_width(),
            opacity: default_opacity(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config object.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON or mistyped fields.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Build the initial UI state. An unknown tool name or a non-finite
    /// number falls back to its default; numbers are pulled into range.
    #[must_use]
    pub fn ui_state(&self) -> UiState {
        let tool = Tool::parse(&self.tool).unwrap_or_else(|| {
            warn!(tool = %self.tool, "unknown tool in config; using default");
            Tool::default()
        });
        UiState {
            tool,
            color: self.color.clone(),
            stroke_width: finite_or("strokeWidth", self.stroke_width, DEFAULT_STROKE_WIDTH).max(0.0),
            opacity: finite_or("opacity", self.opacity, DEFAULT_OPACITY).clamp(0.0, 1.0),
            locked: false,
        }
    }
}

fn finite_or(field: &'static str, value: f64, default: f64) -> f64 {
    if value.is_finite() {
        return value;
    }
    warn!(field, value, "non-finite number in config; using default");
    default
}

fn default_tool() -> String {
    Tool::default().name().to_owned()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_owned()
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

fn default_opacity() -> f64 {
    DEFAULT_OPACITY
}
