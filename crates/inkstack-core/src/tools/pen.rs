//! Freehand pen tools: pen, eraser, fixed pen, highlighter and dashed pen.

use super::{DrawingTool, ToolOperationContext};
use crate::operations::AddShapeOperation;
use crate::render::{Layer, LayerSurface};
use crate::settings::{SettingsProfile, UserSettings};
use crate::shapes::{DashedPen, Pen, PenLineSegment, Shape};
use kurbo::{Point, Size, Vec2};

/// Speed (drawing units per second) at which the width factor reaches 1.
const REFERENCE_SPEED: f64 = 600.0;
/// Weight of the current speed against the previous one.
const SPEED_WEIGHT: f64 = 0.6;
/// Largest relative width change between consecutive segments.
const MAX_WIDTH_STEP: f64 = 0.1;
/// Thinnest segment, relative to the configured width.
const MIN_WIDTH_FACTOR: f64 = 0.2;

/// Segment width for a stroke moving at `velocity`.
///
/// Faster strokes get thinner. The result never moves more than 10% away
/// from `previous_width` and stays within 20% to 100% of `width`.
pub fn modulated_width(width: f64, velocity: Vec2, previous_velocity: Vec2, previous_width: f64) -> f64 {
    let speed = velocity.hypot() / REFERENCE_SPEED;
    let previous_speed = previous_velocity.hypot() / REFERENCE_SPEED;
    let weighted = SPEED_WEIGHT * speed + (1.0 - SPEED_WEIGHT) * previous_speed;
    let raw = if weighted.abs() < f64::EPSILON {
        f64::INFINITY
    } else {
        width / weighted
    };
    let smoothed = raw
        .min(previous_width * (1.0 + MAX_WIDTH_STEP))
        .max(previous_width * (1.0 - MAX_WIDTH_STEP));
    smoothed.min(width).max(width * MIN_WIDTH_FACTOR)
}

/// What happens to a stroke when the drag ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Commit the stroke with an add operation.
    AddOperation,
    /// Finish the stroke but leave committing it to the host, which takes
    /// it with [`DrawingTool::take_finished_shape`].
    FinalizeOnly,
}

/// One configurable tool for every pen variant.
///
/// The stroke in progress is drawn opaque into an offscreen layer, one new
/// segment at a time, and the layer is blended onto the surface at the
/// color's alpha. Overlapping segments of a translucent stroke therefore
/// never darken each other. The layer is kept between strokes and cleared
/// when a new one starts.
///
/// The eraser skips the layer and removes coverage from the surface
/// directly. It draws only segments the surface has not seen yet, until
/// [`DrawingTool::surface_repainted`] says the surface was redrawn.
pub struct PenTool {
    name: &'static str,
    profile: SettingsProfile,
    is_eraser: bool,
    dashed: bool,
    commit: CommitPolicy,
    /// Thin the stroke as the pointer speeds up.
    pub velocity_based_width: bool,
    shape_in_progress: Option<Shape>,
    finished_shape: Option<Shape>,
    last_velocity: Vec2,
    /// Alpha of the configured stroke color, applied when compositing.
    alpha: f64,
    drawing_size: Size,
    layer: Option<Box<dyn Layer>>,
    /// Segments already drawn into the layer, or erased from the surface.
    rendered_segments: usize,
}

impl PenTool {
    fn with_config(name: &'static str, profile: SettingsProfile) -> Self {
        Self {
            name,
            profile,
            is_eraser: false,
            dashed: false,
            commit: CommitPolicy::AddOperation,
            velocity_based_width: false,
            shape_in_progress: None,
            finished_shape: None,
            last_velocity: Vec2::ZERO,
            alpha: 1.0,
            drawing_size: Size::ZERO,
            layer: None,
            rendered_segments: 0,
        }
    }

    /// Pen using the ambient settings.
    pub fn pen() -> Self {
        Self::with_config("Pen", SettingsProfile::Ambient)
    }

    /// Pen that removes what it passes over.
    pub fn eraser() -> Self {
        Self {
            is_eraser: true,
            ..Self::with_config("Eraser", SettingsProfile::Ambient)
        }
    }

    /// Opaque black pen of width 2.
    pub fn fixed_pen() -> Self {
        Self::with_config("FixedPen", SettingsProfile::FixedPen)
    }

    /// Wide translucent highlighter.
    pub fn highlight_pen() -> Self {
        Self::with_config("HighlightPen", SettingsProfile::Highlight)
    }

    /// Dashed fixed pen whose strokes are finalized but not committed.
    pub fn dashed_pen() -> Self {
        Self {
            dashed: true,
            commit: CommitPolicy::FinalizeOnly,
            ..Self::with_config("DashedPen", SettingsProfile::FixedPen)
        }
    }

    pub fn with_velocity_based_width(mut self, enabled: bool) -> Self {
        self.velocity_based_width = enabled;
        self
    }

    /// Alpha captured from the settings when the current stroke started.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    fn derive_settings(&self, ambient: &UserSettings) -> UserSettings {
        self.profile.derive(ambient)
    }

    /// Blank the layer for a new stroke on a drawing of `size`.
    fn reset_layer(&mut self, size: Size) {
        if size != self.drawing_size {
            self.layer = None;
            self.drawing_size = size;
        } else if let Some(layer) = &mut self.layer {
            layer.clear();
        }
        self.rendered_segments = 0;
    }
}

/// Drop the alpha from a shape's stroke color.
fn force_opaque(shape: &mut Shape) {
    if let Some(color) = shape.style_mut().stroke_color.as_mut() {
        *color = color.opaque();
    }
}

impl DrawingTool for PenTool {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_progressive(&self) -> bool {
        self.is_eraser
    }

    fn handle_drag_start(&mut self, ctx: &mut ToolOperationContext<'_>, point: Point) {
        let settings = self.derive_settings(ctx.user_settings);
        self.alpha = settings.stroke_color().map_or(1.0, |c| c.alpha());
        self.last_velocity = Vec2::ZERO;
        self.reset_layer(ctx.drawing.size());

        let mut pen = Pen::new(point);
        pen.is_eraser = self.is_eraser;
        let mut shape = if self.dashed {
            Shape::DashedPen(DashedPen::from_pen(pen))
        } else {
            Shape::Pen(pen)
        };
        shape.apply_settings(&settings);
        force_opaque(&mut shape);
        self.shape_in_progress = Some(shape);
    }

    fn handle_drag_continue(&mut self, _ctx: &mut ToolOperationContext<'_>, point: Point, velocity: Vec2) {
        let Some(pen) = self.shape_in_progress.as_mut().and_then(Shape::as_pen_mut) else {
            return;
        };
        let last_point = pen.last_point();
        let width = if self.velocity_based_width {
            let previous_width = pen.latest_segment().map_or(pen.style.stroke_width, |s| s.width);
            modulated_width(pen.style.stroke_width, velocity, self.last_velocity, previous_width)
        } else {
            pen.style.stroke_width
        };
        if last_point != point {
            pen.add_segment(PenLineSegment::new(last_point, point, width));
        }
        self.last_velocity = velocity;
    }

    fn handle_drag_end(&mut self, ctx: &mut ToolOperationContext<'_>, _point: Point) {
        let Some(mut shape) = self.shape_in_progress.take() else {
            log::warn!("{}: drag ended without a stroke in progress", self.name);
            return;
        };
        self.rendered_segments = 0;
        if let Some(pen) = shape.as_pen_mut() {
            pen.is_finished = true;
        }
        // Restores the translucent color that was forced opaque while drawing.
        shape.apply_settings(&self.derive_settings(ctx.user_settings));

        match self.commit {
            CommitPolicy::AddOperation => ctx.apply(AddShapeOperation::new(shape).into()),
            CommitPolicy::FinalizeOnly => {
                log::debug!("{}: finished shape {} left uncommitted", self.name, shape.id());
                self.finished_shape = Some(shape);
            }
        }
    }

    fn render_shape_in_progress(&mut self, surface: &mut dyn LayerSurface) {
        let Some(shape) = &self.shape_in_progress else {
            return;
        };
        let Some(pen) = shape.as_pen() else {
            return;
        };
        let dashes: &[f64] = match shape {
            Shape::DashedPen(dashed) => &dashed.dashes,
            _ => &[],
        };

        if self.is_eraser {
            pen.render_segments(self.rendered_segments, dashes, surface);
            self.rendered_segments = pen.segments.len();
            return;
        }

        let layer = self
            .layer
            .get_or_insert_with(|| surface.create_layer(self.drawing_size));
        pen.render_segments(self.rendered_segments, dashes, &mut **layer);
        self.rendered_segments = pen.segments.len();
        surface.composite_layer(&**layer, self.alpha);
    }

    fn surface_repainted(&mut self) {
        if self.is_eraser {
            self.rendered_segments = 0;
        }
    }

    fn apply_settings(&mut self, ctx: &mut ToolOperationContext<'_>) {
        let settings = self.derive_settings(ctx.user_settings);
        if let Some(shape) = &mut self.shape_in_progress {
            self.alpha = settings.stroke_color().map_or(1.0, |c| c.alpha());
            shape.apply_settings(&settings);
            force_opaque(shape);
            // Segments drawn in the old style are redrawn.
            if let Some(layer) = &mut self.layer {
                layer.clear();
            }
            self.rendered_segments = 0;
        }
        ctx.tool_settings.is_persistent_buffer_dirty = true;
    }

    fn shape_in_progress(&self) -> Option<&Shape> {
        self.shape_in_progress.as_ref()
    }

    fn take_finished_shape(&mut self) -> Option<Shape> {
        self.finished_shape.take()
    }
}
