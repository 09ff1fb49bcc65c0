//! Tools that draw a shape by dragging from one point to another.

use super::{DrawingTool, ToolOperationContext};
use crate::operations::AddShapeOperation;
use crate::render::LayerSurface;
use crate::settings::SettingsProfile;
use crate::shapes::{Ellipse, Line, Ngon, Rectangle, Shape, Star};
use kurbo::{Point, Vec2};

/// Which shape a [`TwoPointTool`] creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoPointKind {
    Rect,
    Line,
    Ellipse,
    Ngon { sides: u32 },
    Star { points: u32 },
}

impl TwoPointKind {
    fn make_shape(self, point: Point) -> Shape {
        match self {
            TwoPointKind::Rect => Shape::Rect(Rectangle::new(point, point)),
            TwoPointKind::Line => Shape::Line(Line::new(point, point)),
            TwoPointKind::Ellipse => Shape::Ellipse(Ellipse::new(point, point)),
            TwoPointKind::Ngon { sides } => Shape::Ngon(Ngon::new(point, point, sides)),
            TwoPointKind::Star { points } => Shape::Star(Star::new(point, point, points)),
        }
    }

    fn name(self) -> &'static str {
        match self {
            TwoPointKind::Rect => "Rect",
            TwoPointKind::Line => "Line",
            TwoPointKind::Ellipse => "Ellipse",
            TwoPointKind::Ngon { .. } => "Ngon",
            TwoPointKind::Star { .. } => "Star",
        }
    }
}

/// Drag-to-size tool for rectangles, lines, ellipses, polygons and stars.
///
/// The drag start fixes point `a`; every update moves point `b`.
#[derive(Debug, Clone)]
pub struct TwoPointTool {
    kind: TwoPointKind,
    profile: SettingsProfile,
    shape_in_progress: Option<Shape>,
}

impl TwoPointTool {
    pub fn new(kind: TwoPointKind) -> Self {
        Self {
            kind,
            profile: SettingsProfile::TwoPoint,
            shape_in_progress: None,
        }
    }

    pub fn kind(&self) -> TwoPointKind {
        self.kind
    }

    fn set_b(&mut self, point: Point) {
        if let Some(points) = self.shape_in_progress.as_mut().and_then(Shape::as_two_points_mut) {
            points.set_b(point);
        }
    }
}

impl DrawingTool for TwoPointTool {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn handle_drag_start(&mut self, ctx: &mut ToolOperationContext<'_>, point: Point) {
        let settings = self.profile.derive(ctx.user_settings);
        let mut shape = self.kind.make_shape(point);
        shape.apply_settings(&settings);
        self.shape_in_progress = Some(shape);
    }

    fn handle_drag_continue(&mut self, _ctx: &mut ToolOperationContext<'_>, point: Point, _velocity: Vec2) {
        self.set_b(point);
    }

    fn handle_drag_end(&mut self, ctx: &mut ToolOperationContext<'_>, point: Point) {
        self.set_b(point);
        let Some(shape) = self.shape_in_progress.take() else {
            log::warn!("{}: drag ended without a shape in progress", self.name());
            return;
        };
        ctx.apply(AddShapeOperation::new(shape).into());
    }

    fn render_shape_in_progress(&mut self, surface: &mut dyn LayerSurface) {
        if let Some(shape) = &self.shape_in_progress {
            shape.render(surface);
        }
    }

    fn apply_settings(&mut self, ctx: &mut ToolOperationContext<'_>) {
        let settings = self.profile.derive(ctx.user_settings);
        if let Some(shape) = &mut self.shape_in_progress {
            shape.apply_settings(&settings);
        }
        ctx.tool_settings.is_persistent_buffer_dirty = true;
    }

    fn shape_in_progress(&self) -> Option<&Shape> {
        self.shape_in_progress.as_ref()
    }
}
