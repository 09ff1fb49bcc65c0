//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, ShapeTransform, render_styled_path};
use crate::render::Surface;
use crate::settings::UserSettings;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle spanned by two corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// First corner.
    pub a: Point,
    /// Opposite corner.
    pub b: Point,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(default)]
    pub transform: ShapeTransform,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            a,
            b,
            style: ShapeStyle::default(),
            transform: ShapeTransform::IDENTITY,
        }
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::from_points(self.a, self.b)
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn local_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn local_center(&self) -> Point {
        self.as_rect().center()
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn apply_settings(&mut self, settings: &UserSettings) {
        self.style.apply_standard(settings);
    }

    fn render(&self, surface: &mut dyn Surface) {
        let affine = self.transform.affine(self.local_center());
        render_styled_path(self.local_path(), &self.style, affine, surface);
    }
}
