//! Restyling existing shapes.

use super::{DrawingOperation, update_shape};
use crate::drawing::Drawing;
use crate::shapes::{Shape, ShapeStyle, Text};
use serde::{Deserialize, Serialize};

/// Font attributes of a text shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFont {
    pub name: String,
    pub size: f64,
}

impl TextFont {
    pub fn of(text: &Text) -> Self {
        Self {
            name: text.font_name.clone(),
            size: text.font_size,
        }
    }
}

/// Replace a shape's stroke and fill attributes, and the font of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeStyleOperation {
    pub shape: Shape,
    pub style: ShapeStyle,
    pub original_style: ShapeStyle,
    /// New font; None leaves the font alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<TextFont>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_font: Option<TextFont>,
}

impl ChangeStyleOperation {
    pub fn new(shape: Shape, style: ShapeStyle) -> Self {
        let original_style = shape.style().clone();
        Self {
            shape,
            style,
            original_style,
            font: None,
            original_font: None,
        }
    }

    /// Also change the font. Ignored unless the shape is text.
    pub fn with_font(mut self, font: TextFont) -> Self {
        self.original_font = self.shape.as_text().map(TextFont::of);
        if self.original_font.is_some() {
            self.font = Some(font);
        }
        self
    }

    /// Operation turning `shape` into `restyled`, or None when neither the
    /// style nor the font differs.
    pub fn between(shape: &Shape, restyled: &Shape) -> Option<Self> {
        let mut operation = Self::new(shape.clone(), restyled.style().clone());
        if let Some(font) = restyled.as_text().map(TextFont::of) {
            operation = operation.with_font(font);
        }
        let font_changed = operation.font.is_some() && operation.font != operation.original_font;
        if !font_changed {
            operation.font = None;
            operation.original_font = None;
        }
        (font_changed || operation.style != operation.original_style).then_some(operation)
    }

    fn set(&self, drawing: &mut Drawing, style: &ShapeStyle, font: Option<&TextFont>) {
        update_shape(drawing, self.shape.id(), "change_style", |shape| {
            *shape.style_mut() = style.clone();
            if let (Some(font), Some(text)) = (font, shape.as_text_mut()) {
                text.font_name = font.name.clone();
                text.font_size = font.size;
                text.refresh_bounds();
            }
        });
    }
}

impl DrawingOperation for ChangeStyleOperation {
    fn apply(&self, drawing: &mut Drawing) {
        self.set(drawing, &self.style, self.font.as_ref());
    }

    fn revert(&self, drawing: &mut Drawing) {
        self.set(drawing, &self.original_style, self.original_font.as_ref());
    }

    fn current_shape(&self) -> &Shape {
        &self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Ellipse, SerializableColor};
    use kurbo::Point;

    #[test]
    fn test_change_style() {
        let mut drawing = Drawing::default();
        let shape = Shape::Ellipse(Ellipse::new(Point::ZERO, Point::new(8.0, 8.0)));
        let id = shape.id();
        drawing.add(shape.clone());

        let style = ShapeStyle {
            stroke_color: None,
            fill_color: Some(SerializableColor::white()),
            stroke_width: 1.0,
        };
        let op = ChangeStyleOperation::new(shape, style.clone());
        op.apply(&mut drawing);
        assert_eq!(drawing.get(id).unwrap().style(), &style);
        op.revert(&mut drawing);
        assert_eq!(drawing.get(id).unwrap().style(), &ShapeStyle::default());
    }

    #[test]
    fn test_font_change_resizes_text() {
        let mut drawing = Drawing::default();
        let shape = Shape::Text(Text::new("abc"));
        let id = shape.id();
        let original_width = shape.as_text().unwrap().bounding_rect.width();
        drawing.add(shape.clone());

        let mut restyled = shape.clone();
        if let Some(text) = restyled.as_text_mut() {
            text.font_size *= 2.0;
        }
        let op = ChangeStyleOperation::between(&shape, &restyled).unwrap();
        assert_eq!(op.style, op.original_style);

        op.apply(&mut drawing);
        let text = drawing.get(id).and_then(Shape::as_text).unwrap();
        assert_eq!(text.font_size, Text::DEFAULT_FONT_SIZE * 2.0);
        assert!((text.bounding_rect.width() - original_width * 2.0).abs() < 1e-9);

        op.revert(&mut drawing);
        let text = drawing.get(id).and_then(Shape::as_text).unwrap();
        assert_eq!(text.font_size, Text::DEFAULT_FONT_SIZE);
        assert!((text.bounding_rect.width() - original_width).abs() < 1e-9);
    }

    #[test]
    fn test_between_unchanged_is_none() {
        let shape = Shape::Text(Text::new("same"));
        assert!(ChangeStyleOperation::between(&shape, &shape.clone()).is_none());
        let ellipse = Shape::Ellipse(Ellipse::new(Point::ZERO, Point::new(2.0, 2.0)));
        assert!(ChangeStyleOperation::between(&ellipse, &ellipse.clone()).is_none());
    }
}
