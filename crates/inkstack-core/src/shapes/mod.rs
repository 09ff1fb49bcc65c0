//! Shape definitions for drawings.

mod ellipse;
mod line;
mod ngon;
mod pen;
mod rectangle;
mod star;
mod text;

pub use ellipse::Ellipse;
pub use line::Line;
pub use ngon::Ngon;
pub use pen::{DashedPen, Pen, PenLineSegment};
pub use rectangle::Rectangle;
pub use star::Star;
pub use text::{ADVANCE_EM, LINE_HEIGHT_EM, Text};

use crate::error::{DecodeError, DecodeResult, read_tag};
use crate::render::{CompositeMode, StrokeParams, Surface};
use crate::settings::UserSettings;
use kurbo::{Affine, BezPath, Point, Shape as KurboShape, Vec2};
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Alpha as a fraction in `0.0..=1.0`.
    pub fn alpha(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// Same color with its alpha replaced by `alpha` (a fraction).
    pub fn with_alpha(self, alpha: f64) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    /// Same color, fully opaque.
    pub fn opaque(self) -> Self {
        Self { a: 255, ..self }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Rendering attributes shared by every shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color (None = no stroke).
    pub stroke_color: Option<SerializableColor>,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Stroke width.
    pub stroke_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: Some(SerializableColor::black()),
            fill_color: None,
            stroke_width: 2.0,
        }
    }
}

impl ShapeStyle {
    /// Take stroke, fill and width from the settings as they are.
    pub fn apply_standard(&mut self, settings: &UserSettings) {
        self.stroke_color = settings.stroke_color();
        self.fill_color = settings.fill_color();
        self.stroke_width = settings.stroke_width();
    }

    /// Take stroke and width only; a missing stroke color falls back to black.
    pub fn apply_stroke_only(&mut self, settings: &UserSettings) {
        self.stroke_color = Some(settings.stroke_color().unwrap_or_else(SerializableColor::black));
        self.stroke_width = settings.stroke_width();
    }

    /// Stroke parameters for the renderer, or None when there is no stroke.
    pub fn stroke_params(&self) -> Option<StrokeParams> {
        self.stroke_color.map(|c| StrokeParams::new(c.into(), self.stroke_width))
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }
}

/// Translation, rotation and uniform scale applied to a shape's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeTransform {
    pub translation: Vec2,
    /// Rotation in radians.
    pub rotation: f64,
    pub scale: f64,
}

impl Default for ShapeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ShapeTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rotation: 0.0,
        scale: 1.0,
    };

    pub fn new(translation: Vec2, rotation: f64, scale: f64) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Transform translating by `translation` only.
    pub fn translate(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Affine map with rotation and scale about `center`, then translation.
    pub fn affine(&self, center: Point) -> Affine {
        Affine::translate(self.translation)
            * Affine::rotate_about(self.rotation, center)
            * Affine::scale_about(self.scale, center)
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Fewest sides of a polygon or spikes of a star.
pub const MIN_VERTEX_COUNT: u32 = 3;
/// Most sides of a polygon or spikes of a star.
pub const MAX_VERTEX_COUNT: u32 = 1000;

pub(crate) fn clamp_vertex_count(count: u32) -> u32 {
    count.clamp(MIN_VERTEX_COUNT, MAX_VERTEX_COUNT)
}

/// Deserialize a side or spike count, rejecting counts outside
/// [`MIN_VERTEX_COUNT`]..=[`MAX_VERTEX_COUNT`].
pub(crate) fn deserialize_vertex_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let count = u32::deserialize(deserializer)?;
    if (MIN_VERTEX_COUNT..=MAX_VERTEX_COUNT).contains(&count) {
        Ok(count)
    } else {
        Err(serde::de::Error::custom(format_args!(
            "vertex count {count} outside {MIN_VERTEX_COUNT}..={MAX_VERTEX_COUNT}"
        )))
    }
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Geometry before the shape transform is applied.
    fn local_path(&self) -> BezPath;

    /// Point that rotation and scale pivot around.
    fn local_center(&self) -> Point {
        self.local_path().bounding_box().center()
    }

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Copy the relevant user settings onto this shape.
    fn apply_settings(&mut self, settings: &UserSettings);

    /// Draw the shape onto a surface.
    fn render(&self, surface: &mut dyn Surface);
}

/// Shapes defined by two corner or end points.
pub trait HasTwoPoints {
    fn a(&self) -> Point;
    fn b(&self) -> Point;
    fn set_a(&mut self, point: Point);
    fn set_b(&mut self, point: Point);
}

/// Shapes positioned by a [`ShapeTransform`].
pub trait HasTransform {
    fn transform(&self) -> ShapeTransform;
    fn set_transform(&mut self, transform: ShapeTransform);
}

/// Stroke and fill a path with a standard style, honoring the transform.
pub(crate) fn render_styled_path(
    mut path: BezPath,
    style: &ShapeStyle,
    affine: Affine,
    surface: &mut dyn Surface,
) {
    path.apply_affine(affine);
    if let Some(fill) = style.fill() {
        surface.fill_path(&path, fill);
    }
    if let Some(stroke) = style.stroke_params() {
        surface.stroke_path(&path, &stroke);
    }
}

/// Enum wrapper for all shape types.
///
/// Serialized with an explicit `"type"` discriminant; decoding dispatches on
/// that tag (see [`Shape::from_value`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Ellipse(Ellipse),
    Line(Line),
    Ngon(Ngon),
    Pen(Pen),
    DashedPen(DashedPen),
    Rect(Rectangle),
    Star(Star),
    Text(Text),
}

impl Shape {
    /// Discriminants of every known variant, in declaration order.
    pub const KINDS: [&'static str; 8] = [
        "ellipse",
        "line",
        "ngon",
        "pen",
        "dashed_pen",
        "rect",
        "star",
        "text",
    ];

    /// Decode a shape record by its `"type"` tag.
    pub fn from_value(value: serde_json::Value) -> DecodeResult<Self> {
        fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> DecodeResult<T> {
            serde_json::from_value(value).map_err(|source| DecodeError::Malformed {
                kind: "shape",
                source,
            })
        }

        let tag = read_tag(&value, "shape", "type")?.to_string();
        match tag.as_str() {
            "ellipse" => decode(value).map(Shape::Ellipse),
            "line" => decode(value).map(Shape::Line),
            "ngon" => decode(value).map(Shape::Ngon),
            "pen" => decode(value).map(Shape::Pen),
            "dashed_pen" => decode(value).map(Shape::DashedPen),
            "rect" => decode(value).map(Shape::Rect),
            "star" => decode(value).map(Shape::Star),
            "text" => decode(value).map(Shape::Text),
            _ => Err(DecodeError::UnknownShape(tag)),
        }
    }

    /// Decode a shape from JSON text.
    pub fn from_json(json: &str) -> DecodeResult<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The serialized discriminant of this shape.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Ellipse(_) => "ellipse",
            Shape::Line(_) => "line",
            Shape::Ngon(_) => "ngon",
            Shape::Pen(_) => "pen",
            Shape::DashedPen(_) => "dashed_pen",
            Shape::Rect(_) => "rect",
            Shape::Star(_) => "star",
            Shape::Text(_) => "text",
        }
    }

    fn as_trait(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Ellipse(s) => s,
            Shape::Line(s) => s,
            Shape::Ngon(s) => s,
            Shape::Pen(s) => s,
            Shape::DashedPen(s) => s,
            Shape::Rect(s) => s,
            Shape::Star(s) => s,
            Shape::Text(s) => s,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Ellipse(s) => s,
            Shape::Line(s) => s,
            Shape::Ngon(s) => s,
            Shape::Pen(s) => s,
            Shape::DashedPen(s) => s,
            Shape::Rect(s) => s,
            Shape::Star(s) => s,
            Shape::Text(s) => s,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.as_trait().id()
    }

    pub fn style(&self) -> &ShapeStyle {
        self.as_trait().style()
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        self.as_trait_mut().style_mut()
    }

    pub fn apply_settings(&mut self, settings: &UserSettings) {
        self.as_trait_mut().apply_settings(settings);
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        self.as_trait().render(surface);
    }

    /// Geometry with the shape transform applied.
    pub fn to_path(&self) -> BezPath {
        let shape = self.as_trait();
        let mut path = shape.local_path();
        path.apply_affine(self.transform().affine(shape.local_center()));
        path
    }

    /// Two-point view of this shape, if it has one.
    pub fn as_two_points(&self) -> Option<&dyn HasTwoPoints> {
        match self {
            Shape::Ellipse(s) => Some(s),
            Shape::Line(s) => Some(s),
            Shape::Ngon(s) => Some(s),
            Shape::Rect(s) => Some(s),
            Shape::Star(s) => Some(s),
            Shape::Pen(_) | Shape::DashedPen(_) | Shape::Text(_) => None,
        }
    }

    pub fn as_two_points_mut(&mut self) -> Option<&mut dyn HasTwoPoints> {
        match self {
            Shape::Ellipse(s) => Some(s),
            Shape::Line(s) => Some(s),
            Shape::Ngon(s) => Some(s),
            Shape::Rect(s) => Some(s),
            Shape::Star(s) => Some(s),
            Shape::Pen(_) | Shape::DashedPen(_) | Shape::Text(_) => None,
        }
    }

    pub fn transform(&self) -> ShapeTransform {
        self.as_transform().transform()
    }

    /// Transform view; every variant is positioned by a transform.
    pub fn as_transform(&self) -> &dyn HasTransform {
        match self {
            Shape::Ellipse(s) => s,
            Shape::Line(s) => s,
            Shape::Ngon(s) => s,
            Shape::Pen(s) => s,
            Shape::DashedPen(s) => s,
            Shape::Rect(s) => s,
            Shape::Star(s) => s,
            Shape::Text(s) => s,
        }
    }

    pub fn as_transform_mut(&mut self) -> &mut dyn HasTransform {
        match self {
            Shape::Ellipse(s) => s,
            Shape::Line(s) => s,
            Shape::Ngon(s) => s,
            Shape::Pen(s) => s,
            Shape::DashedPen(s) => s,
            Shape::Rect(s) => s,
            Shape::Star(s) => s,
            Shape::Text(s) => s,
        }
    }

    /// The freehand stroke of a pen or dashed pen.
    pub fn as_pen(&self) -> Option<&Pen> {
        match self {
            Shape::Pen(p) => Some(p),
            Shape::DashedPen(d) => Some(&d.pen),
            _ => None,
        }
    }

    pub fn as_pen_mut(&mut self) -> Option<&mut Pen> {
        match self {
            Shape::Pen(p) => Some(p),
            Shape::DashedPen(d) => Some(&mut d.pen),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Whether this shape erases what is beneath it.
    pub fn composite_mode(&self) -> CompositeMode {
        match self.as_pen() {
            Some(pen) if pen.is_eraser => CompositeMode::DestinationOut,
            _ => CompositeMode::SourceOver,
        }
    }
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Shape::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Implement [`HasTransform`] for a shape struct with a `transform` field.
macro_rules! impl_has_transform {
    ($($shape:ty),+ $(,)?) => {
        $(
            impl HasTransform for $shape {
                fn transform(&self) -> ShapeTransform {
                    self.transform
                }

                fn set_transform(&mut self, transform: ShapeTransform) {
                    self.transform = transform;
                }
            }
        )+
    };
}

impl_has_transform!(Ellipse, Line, Ngon, Pen, Rectangle, Star, Text);

/// Implement [`HasTwoPoints`] for a shape struct with `a` and `b` fields.
macro_rules! impl_has_two_points {
    ($($shape:ty),+ $(,)?) => {
        $(
            impl HasTwoPoints for $shape {
                fn a(&self) -> Point {
                    self.a
                }

                fn b(&self) -> Point {
                    self.b
                }

                fn set_a(&mut self, point: Point) {
                    self.a = point;
                }

                fn set_b(&mut self, point: Point) {
                    self.b = point;
                }
            }
        )+
    };
}

impl_has_two_points!(Ellipse, Line, Ngon, Rectangle, Star);
