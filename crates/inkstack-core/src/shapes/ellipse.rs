//! Ellipse shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, ShapeTransform, render_styled_path};
use crate::render::Surface;
use crate::settings::UserSettings;
use kurbo::{BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ellipse inscribed in the box spanned by two corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    pub a: Point,
    pub b: Point,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(default)]
    pub transform: ShapeTransform,
}

impl Ellipse {
    /// Create a new ellipse.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            a,
            b,
            style: ShapeStyle::default(),
            transform: ShapeTransform::IDENTITY,
        }
    }

    pub fn as_ellipse(&self) -> KurboEllipse {
        KurboEllipse::from_rect(Rect::from_points(self.a, self.b))
    }
}

impl ShapeTrait for Ellipse {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn local_path(&self) -> BezPath {
        self.as_ellipse().to_path(0.1)
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
        self.style.apply_standard(settings);
    }

    fn render(&self, surface: &mut dyn Surface) {
        let affine = self.transform.affine(self.local_center());
        render_styled_path(self.local_path(), &self.style, affine, surface);
    }
}
