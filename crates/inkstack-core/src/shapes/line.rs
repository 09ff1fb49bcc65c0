//! Line shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, ShapeTransform, render_styled_path};
use crate::render::Surface;
use crate::settings::UserSettings;
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start point.
    pub a: Point,
    /// End point.
    pub b: Point,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(default)]
    pub transform: ShapeTransform,
}

impl Line {
    /// Create a new line.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            a,
            b,
            style: ShapeStyle::default(),
            transform: ShapeTransform::IDENTITY,
        }
    }

    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn local_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.a);
        path.line_to(self.b);
        path
    }

    fn local_center(&self) -> Point {
        self.a.midpoint(self.b)
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
        let affine = self.transform.affine(self.local_center());
        render_styled_path(self.local_path(), &self.style, affine, surface);
    }
}
