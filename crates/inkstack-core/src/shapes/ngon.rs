//! Regular polygon shape.

use super::{
    ShapeId, ShapeStyle, ShapeTrait, ShapeTransform, clamp_vertex_count, deserialize_vertex_count,
    render_styled_path,
};
use crate::render::Surface;
use crate::settings::UserSettings;
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use uuid::Uuid;

/// A regular polygon centred at `a` with one vertex at `b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ngon {
    pub(crate) id: ShapeId,
    /// Center.
    pub a: Point,
    /// First vertex.
    pub b: Point,
    /// Number of sides.
    #[serde(deserialize_with = "deserialize_vertex_count")]
    pub sides: u32,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(default)]
    pub transform: ShapeTransform,
}

impl Ngon {
    pub const DEFAULT_SIDES: u32 = 5;

    /// Create a new polygon. The side count is clamped to the supported range.
    pub fn new(a: Point, b: Point, sides: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            a,
            b,
            sides: clamp_vertex_count(sides),
            style: ShapeStyle::default(),
            transform: ShapeTransform::IDENTITY,
        }
    }

    /// Vertices in order, starting at `b`.
    pub fn vertices(&self) -> Vec<Point> {
        let radius = self.a.distance(self.b);
        let start = (self.b - self.a).atan2();
        let sides = clamp_vertex_count(self.sides) as usize;
        (0..sides)
            .map(|i| {
                let angle = start + TAU * i as f64 / sides as f64;
                self.a + Vec2::from_angle(angle) * radius
            })
            .collect()
    }
}

/// Closed path through `points`.
pub(crate) fn closed_polygon(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for point in iter {
            path.line_to(*point);
        }
        path.close_path();
    }
    path
}

impl ShapeTrait for Ngon {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn local_path(&self) -> BezPath {
        closed_polygon(&self.vertices())
    }

    fn local_center(&self) -> Point {
        self.a
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::MAX_VERTEX_COUNT;

    #[test]
    fn test_vertices_start_at_b() {
        let ngon = Ngon::new(Point::ZERO, Point::new(10.0, 0.0), 4);
        let vertices = ngon.vertices();
        assert_eq!(vertices.len(), 4);
        assert!((vertices[0].x - 10.0).abs() < 1e-9);
        assert!((vertices[1].y - 10.0).abs() < 1e-9);
        assert!((vertices[2].x + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_sides() {
        let ngon = Ngon::new(Point::ZERO, Point::new(1.0, 0.0), 1);
        assert_eq!(ngon.sides, 3);
        let mut ngon = Ngon::new(Point::ZERO, Point::new(1.0, 0.0), 4_000_000_000);
        assert_eq!(ngon.sides, MAX_VERTEX_COUNT);
        ngon.sides = 4_000_000_000;
        assert_eq!(ngon.vertices().len(), MAX_VERTEX_COUNT as usize);
    }

    #[test]
    fn test_degenerate_ngon_has_path() {
        let ngon = Ngon::new(Point::ZERO, Point::ZERO, 6);
        assert!(!ngon.local_path().elements().is_empty());
    }
}
