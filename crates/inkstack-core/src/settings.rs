//! User settings and the per-tool settings derivation.

use crate::shapes::{SerializableColor, ShapeId};
use serde::{Deserialize, Serialize};

/// Stroke width forced onto shapes drawn with two-point tools.
pub const TWO_POINT_STROKE_WIDTH: f64 = 2.0;
/// Stroke width of the fixed pen.
pub const FIXED_PEN_STROKE_WIDTH: f64 = 2.0;
/// Stroke width of the highlight pen.
pub const HIGHLIGHT_STROKE_WIDTH: f64 = 20.0;
/// Alpha applied to the ambient stroke color by the highlight pen.
pub const HIGHLIGHT_ALPHA: f64 = 0.2;

/// A field of [`UserSettings`] that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsChange {
    StrokeColor,
    FillColor,
    StrokeWidth,
    FontName,
    FontSize,
}

/// Session-wide drawing settings read by tools when a gesture starts.
///
/// Every setter that actually changes a value queues a [`SettingsChange`].
/// Hosts poll the queue with [`UserSettings::drain_changes`] to refresh
/// their controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    stroke_color: Option<SerializableColor>,
    fill_color: Option<SerializableColor>,
    stroke_width: f64,
    font_name: String,
    font_size: f64,
    #[serde(skip)]
    changes: Vec<SettingsChange>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self::new(
            Some(SerializableColor::black()),
            None,
            5.0,
            "Helvetica Neue",
            24.0,
        )
    }
}

impl UserSettings {
    pub fn new(
        stroke_color: Option<SerializableColor>,
        fill_color: Option<SerializableColor>,
        stroke_width: f64,
        font_name: impl Into<String>,
        font_size: f64,
    ) -> Self {
        Self {
            stroke_color,
            fill_color,
            stroke_width,
            font_name: font_name.into(),
            font_size,
            changes: Vec::new(),
        }
    }

    pub fn stroke_color(&self) -> Option<SerializableColor> {
        self.stroke_color
    }

    pub fn fill_color(&self) -> Option<SerializableColor> {
        self.fill_color
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn set_stroke_color(&mut self, color: Option<SerializableColor>) {
        if self.stroke_color != color {
            self.stroke_color = color;
            self.changes.push(SettingsChange::StrokeColor);
        }
    }

    pub fn set_fill_color(&mut self, color: Option<SerializableColor>) {
        if self.fill_color != color {
            self.fill_color = color;
            self.changes.push(SettingsChange::FillColor);
        }
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        if self.stroke_width != width {
            self.stroke_width = width;
            self.changes.push(SettingsChange::StrokeWidth);
        }
    }

    pub fn set_font_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.font_name != name {
            self.font_name = name;
            self.changes.push(SettingsChange::FontName);
        }
    }

    pub fn set_font_size(&mut self, size: f64) {
        if self.font_size != size {
            self.font_size = size;
            self.changes.push(SettingsChange::FontSize);
        }
    }

    /// Take all changes queued since the last call, oldest first.
    pub fn drain_changes(&mut self) -> Vec<SettingsChange> {
        std::mem::take(&mut self.changes)
    }

    /// Whether changes are waiting to be drained.
    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Copy of the values without the pending change queue.
    fn snapshot(&self) -> Self {
        Self::new(
            self.stroke_color,
            self.fill_color,
            self.stroke_width,
            self.font_name.clone(),
            self.font_size,
        )
    }
}

/// Pure mapping from the ambient settings to the settings a tool applies
/// to the shapes it creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SettingsProfile {
    /// Use the ambient settings as they are.
    #[default]
    Ambient,
    /// Ambient colors and font with the stroke width forced to 2.
    TwoPoint,
    /// Opaque black stroke of width 2.
    FixedPen,
    /// Ambient stroke color at 20% alpha with width 20.
    Highlight,
}

impl SettingsProfile {
    /// Derive the effective settings. Fill and font fields always pass through.
    pub fn derive(self, ambient: &UserSettings) -> UserSettings {
        let mut derived = ambient.snapshot();
        match self {
            SettingsProfile::Ambient => {}
            SettingsProfile::TwoPoint => {
                derived.stroke_width = TWO_POINT_STROKE_WIDTH;
            }
            SettingsProfile::FixedPen => {
                derived.stroke_color = Some(SerializableColor::black());
                derived.stroke_width = FIXED_PEN_STROKE_WIDTH;
            }
            SettingsProfile::Highlight => {
                derived.stroke_color = ambient.stroke_color.map(|c| c.with_alpha(HIGHLIGHT_ALPHA));
                derived.stroke_width = HIGHLIGHT_STROKE_WIDTH;
            }
        }
        derived
    }
}

/// Mutable state shared between the host and the active tool.
#[derive(Debug, Clone, Default)]
pub struct ToolSettings {
    /// Set when the committed drawing must be re-rendered by the host.
    pub is_persistent_buffer_dirty: bool,
    /// Shape targeted by style changes from the host.
    pub selected_shape: Option<ShapeId>,
}

impl ToolSettings {
    /// Read and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.is_persistent_buffer_dirty)
    }
}
