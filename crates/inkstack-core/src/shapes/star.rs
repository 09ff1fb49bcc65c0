//! Star shape.

use super::ngon::closed_polygon;
use super::{
    ShapeId, ShapeStyle, ShapeTrait, ShapeTransform, clamp_vertex_count, deserialize_vertex_count,
    render_styled_path,
};
use crate::render::Surface;
use crate::settings::UserSettings;
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use uuid::Uuid;

/// A star centred at `a` with its first spike pointing at `b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub(crate) id: ShapeId,
    /// Center.
    pub a: Point,
    /// Tip of the first spike.
    pub b: Point,
    /// Number of spikes.
    #[serde(deserialize_with = "deserialize_vertex_count")]
    pub points: u32,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(default)]
    pub transform: ShapeTransform,
}

impl Star {
    pub const DEFAULT_POINTS: u32 = 5;
    /// Inner radius as a fraction of the outer radius.
    pub const INNER_RATIO: f64 = 0.5;

    pub fn new(a: Point, b: Point, points: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            a,
            b,
            points: clamp_vertex_count(points),
            style: ShapeStyle::default(),
            transform: ShapeTransform::IDENTITY,
        }
    }

    /// Outline vertices alternating between spike tips and inner corners.
    pub fn outline(&self) -> Vec<Point> {
        let outer = self.a.distance(self.b);
        let inner = outer * Self::INNER_RATIO;
        let start = (self.b - self.a).atan2();
        let points = clamp_vertex_count(self.points) as usize;
        (0..points * 2)
            .map(|i| {
                let radius = if i % 2 == 0 { outer } else { inner };
                let angle = start + PI * i as f64 / points as f64;
                self.a + Vec2::from_angle(angle) * radius
            })
            .collect()
    }
}

impl ShapeTrait for Star {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn local_path(&self) -> BezPath {
        closed_polygon(&self.outline())
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
