//! Freehand pen strokes.

use super::{HasTransform, ShapeId, ShapeStyle, ShapeTrait, ShapeTransform};
use crate::render::{CompositeMode, StrokeParams, Surface};
use crate::settings::UserSettings;
use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One straight piece of a freehand stroke with its own width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenLineSegment {
    pub a: Point,
    pub b: Point,
    pub width: f64,
}

impl PenLineSegment {
    pub fn new(a: Point, b: Point, width: f64) -> Self {
        Self { a, b, width }
    }

    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.a);
        path.line_to(self.b);
        path
    }
}

/// A freehand stroke: an anchor point followed by connected segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub(crate) id: ShapeId,
    /// Anchor where the stroke began.
    pub start: Point,
    /// Segments in drawing order; each starts where the previous ended.
    pub segments: Vec<PenLineSegment>,
    /// False while the stroke is still being drawn.
    pub is_finished: bool,
    /// Erasers remove what is beneath them instead of painting.
    #[serde(default)]
    pub is_eraser: bool,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(default)]
    pub transform: ShapeTransform,
}

impl Pen {
    /// Create an empty, unfinished stroke anchored at `start`.
    pub fn new(start: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            segments: Vec::new(),
            is_finished: false,
            is_eraser: false,
            style: ShapeStyle::default(),
            transform: ShapeTransform::IDENTITY,
        }
    }

    pub fn add_segment(&mut self, segment: PenLineSegment) {
        self.segments.push(segment);
    }

    /// End of the last segment, or the anchor when there is none.
    pub fn last_point(&self) -> Point {
        self.segments.last().map_or(self.start, |s| s.b)
    }

    pub fn latest_segment(&self) -> Option<&PenLineSegment> {
        self.segments.last()
    }

    /// Anchor followed by every segment end.
    pub fn points(&self) -> Vec<Point> {
        std::iter::once(self.start)
            .chain(self.segments.iter().map(|s| s.b))
            .collect()
    }

    fn color(&self) -> Color {
        self.style
            .stroke_color
            .unwrap_or_else(super::SerializableColor::black)
            .into()
    }

    fn mode(&self) -> CompositeMode {
        if self.is_eraser {
            CompositeMode::DestinationOut
        } else {
            CompositeMode::SourceOver
        }
    }

    /// Draw `segments[from..]` one at a time, each with its own width.
    pub fn render_segments(&self, from: usize, dashes: &[f64], surface: &mut dyn Surface) {
        let affine = self.transform.affine(self.local_center());
        let color = self.color();
        for segment in self.segments.iter().skip(from) {
            let mut path = segment.to_path();
            path.apply_affine(affine);
            let stroke = StrokeParams::new(color, segment.width)
                .with_dashes(dashes)
                .with_mode(self.mode());
            surface.stroke_path(&path, &stroke);
        }
    }

    /// A stroke without segments is drawn as a dot.
    fn render_dot(&self, surface: &mut dyn Surface) {
        if self.is_eraser {
            return;
        }
        let center = self.transform.affine(self.start) * self.start;
        let dot = Circle::new(center, self.style.stroke_width / 2.0).to_path(0.1);
        surface.fill_path(&dot, self.color());
    }
}

impl ShapeTrait for Pen {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn local_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        for segment in &self.segments {
            path.line_to(segment.b);
        }
        path
    }

    fn local_center(&self) -> Point {
        let points = self.points();
        let bounds = points
            .iter()
            .fold(Rect::from_points(self.start, self.start), |r, p| r.union_pt(*p));
        bounds.center()
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn apply_settings(&mut self, settings: &UserSettings) {
        self.style.apply_stroke_only(settings);
    }

    fn render(&self, surface: &mut dyn Surface) {
        if self.segments.is_empty() {
            self.render_dot(surface);
        } else {
            self.render_segments(0, &[], surface);
        }
    }
}

/// A pen stroke rendered as one dashed polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashedPen {
    pub pen: Pen,
    /// Alternating on/off dash lengths.
    pub dashes: Vec<f64>,
}

impl DashedPen {
    pub const DEFAULT_DASHES: [f64; 2] = [8.0, 6.0];

    pub fn from_pen(pen: Pen) -> Self {
        Self {
            pen,
            dashes: Self::DEFAULT_DASHES.to_vec(),
        }
    }
}

impl ShapeTrait for DashedPen {
    fn id(&self) -> ShapeId {
        self.pen.id
    }

    fn local_path(&self) -> BezPath {
        self.pen.local_path()
    }

    fn local_center(&self) -> Point {
        self.pen.local_center()
    }

    fn style(&self) -> &ShapeStyle {
        &self.pen.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.pen.style
    }

    fn apply_settings(&mut self, settings: &UserSettings) {
        self.pen.apply_settings(settings);
    }

    fn render(&self, surface: &mut dyn Surface) {
        if self.pen.segments.is_empty() {
            self.pen.render_dot(surface);
            return;
        }
        let mut path = self.local_path();
        path.apply_affine(self.pen.transform.affine(self.local_center()));
        let stroke = StrokeParams::new(self.pen.color(), self.pen.style.stroke_width)
            .with_dashes(&self.dashes)
            .with_mode(self.pen.mode());
        surface.stroke_path(&path, &stroke);
    }
}

impl HasTransform for DashedPen {
    fn transform(&self) -> ShapeTransform {
        self.pen.transform
    }

    fn set_transform(&mut self, transform: ShapeTransform) {
        self.pen.transform = transform;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{DrawCall, RecordingSurface};

    fn stroke() -> Pen {
        let mut pen = Pen::new(Point::new(0.0, 0.0));
        pen.add_segment(PenLineSegment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 4.0));
        pen.add_segment(PenLineSegment::new(Point::new(10.0, 0.0), Point::new(10.0, 10.0), 6.0));
        pen
    }

    #[test]
    fn test_last_point() {
        let pen = Pen::new(Point::new(3.0, 4.0));
        assert_eq!(pen.last_point(), Point::new(3.0, 4.0));
        assert_eq!(stroke().last_point(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_points() {
        assert_eq!(stroke().points().len(), 3);
    }

    #[test]
    fn test_render_uses_segment_widths() {
        let mut surface = RecordingSurface::new();
        stroke().render(&mut surface);
        let widths: Vec<f64> = surface
            .calls()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Stroke { width, .. } => Some(*width),
                _ => None,
            })
            .collect();
        assert_eq!(widths, vec![4.0, 6.0]);
    }

    #[test]
    fn test_eraser_uses_destination_out() {
        let mut pen = stroke();
        pen.is_eraser = true;
        let mut surface = RecordingSurface::new();
        pen.render_segments(1, &[], &mut surface);
        assert_eq!(
            surface.calls(),
            vec![DrawCall::Stroke {
                target: "surface",
                color: super::super::SerializableColor::black(),
                width: 6.0,
                dashed: false,
                mode: CompositeMode::DestinationOut,
            }]
        );
    }

    #[test]
    fn test_empty_stroke_renders_dot() {
        let mut surface = RecordingSurface::new();
        Pen::new(Point::new(5.0, 5.0)).render(&mut surface);
        assert!(matches!(surface.calls()[..], [DrawCall::Fill { .. }]));
    }

    #[test]
    fn test_dashed_pen_renders_single_dashed_path() {
        let dashed = DashedPen::from_pen(stroke());
        let mut surface = RecordingSurface::new();
        dashed.render(&mut surface);
        let calls = surface.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], DrawCall::Stroke { dashed: true, .. }));
    }
}
