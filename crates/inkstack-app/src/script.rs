//! Session scripts: recorded editing sessions replayed by the host.
//!
//! A script is a JSON document:
//! ```json
//! {
//!   "size": { "width": 200, "height": 120 },
//!   "settings": { "stroke_width": 4.0 },
//!   "steps": [
//!     { "action": "select_tool", "tool": "rect" },
//!     { "action": "drag", "points": [{ "x": 10, "y": 10 }, { "x": 90, "y": 60 }] },
//!     { "action": "undo" }
//!   ]
//! }
//! ```

use crate::{AppError, AppResult};
use inkstack_core::UserSettings;
use inkstack_core::shapes::SerializableColor;
use inkstack_core::tools::ToolKind;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Milliseconds between two recorded drag points unless a step says otherwise.
pub const DEFAULT_INTERVAL_MS: f64 = 16.0;

fn default_interval() -> f64 {
    DEFAULT_INTERVAL_MS
}

/// One recorded user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    SelectTool {
        #[serde(flatten)]
        tool: ToolKind,
    },
    Tap {
        point: Point,
    },
    /// A drag through `points`. The velocity of each update is derived
    /// from the distance to the previous point over `interval_ms`.
    Drag {
        points: Vec<Point>,
        #[serde(default = "default_interval")]
        interval_ms: f64,
        /// End with a cancel instead of a release.
        #[serde(default)]
        cancel: bool,
    },
    Undo,
    Redo,
    SetText {
        text: String,
    },
    SetTextWidth {
        width: Option<f64>,
    },
    StrokeColor {
        color: Option<SerializableColor>,
    },
    FillColor {
        color: Option<SerializableColor>,
    },
    StrokeWidth {
        width: f64,
    },
    Font {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        size: Option<f64>,
    },
    /// Select the shape at `index` in z-order (0 = back).
    Select {
        index: usize,
    },
    RestyleSelection,
    DeleteSelection,
}

/// A complete recorded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// Canvas size. Defaults to the core's default drawing size.
    #[serde(default)]
    pub size: Option<Size>,
    /// Settings in effect before the first step.
    #[serde(default)]
    pub settings: UserSettings,
    /// Canvas color behind the drawing in the exported image.
    #[serde(default = "SerializableColor::white")]
    pub background: SerializableColor,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> AppResult<Self> {
        serde_json::from_str(json).map_err(AppError::Script)
    }

    /// Read and parse a script file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let script = Self::from_json(&json)?;
        log::info!("Loaded {} steps from {}", script.steps.len(), path.display());
        Ok(script)
    }
}
