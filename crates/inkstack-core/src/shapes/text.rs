//! Text shape.

use super::{SerializableColor, ShapeId, ShapeStyle, ShapeTrait, ShapeTransform};
use crate::render::{Surface, TextRun};
use crate::settings::UserSettings;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Horizontal advance of one character, in ems.
pub const ADVANCE_EM: f64 = 0.6;
/// Distance between baselines, in ems.
pub const LINE_HEIGHT_EM: f64 = 1.2;

/// A block of text laid out from the local origin and placed by its transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// The text content.
    pub text: String,
    pub font_name: String,
    /// Font size in drawing units.
    pub font_size: f64,
    /// Wrapping width chosen by the user. None = grow with the content.
    #[serde(default)]
    pub explicit_width: Option<f64>,
    /// Layout box computed by [`Text::measure`] when the content or width last changed.
    pub bounding_rect: Rect,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(default)]
    pub transform: ShapeTransform,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;

    /// Create a text shape at the origin.
    pub fn new(text: impl Into<String>) -> Self {
        let mut shape = Self {
            id: Uuid::new_v4(),
            text: text.into(),
            font_name: String::from("Helvetica Neue"),
            font_size: Self::DEFAULT_FONT_SIZE,
            explicit_width: None,
            bounding_rect: Rect::ZERO,
            style: ShapeStyle::default(),
            transform: ShapeTransform::IDENTITY,
        };
        shape.bounding_rect = shape.measure(None);
        shape
    }

    /// Text placed with its top-left corner at `position`.
    pub fn at(position: Point, text: impl Into<String>) -> Self {
        let mut shape = Self::new(text);
        shape.transform = ShapeTransform::translate(position.to_vec2());
        shape
    }

    fn advance(&self) -> f64 {
        self.font_size * ADVANCE_EM
    }

    fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT_EM
    }

    /// Break the content into display lines, wrapping words at `explicit_width`.
    pub fn lines(&self, explicit_width: Option<f64>) -> Vec<String> {
        let max_chars = explicit_width
            .map(|w| ((w / self.advance()).floor() as usize).max(1))
            .unwrap_or(usize::MAX);

        let mut lines = Vec::new();
        for paragraph in self.text.split('\n') {
            let mut line = String::new();
            for word in paragraph.split(' ') {
                let candidate = if line.is_empty() {
                    word.chars().count()
                } else {
                    line.chars().count() + 1 + word.chars().count()
                };
                if candidate <= max_chars {
                    if !line.is_empty() {
                        line.push(' ');
                    }
                    line.push_str(word);
                    continue;
                }
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                // Words longer than a whole line are split by character.
                let chars: Vec<char> = word.chars().collect();
                let mut chunks = chars.chunks(max_chars).peekable();
                while let Some(chunk) = chunks.next() {
                    if chunks.peek().is_some() {
                        lines.push(chunk.iter().collect());
                    } else {
                        line = chunk.iter().collect();
                    }
                }
            }
            lines.push(line);
        }
        lines
    }

    /// Layout box for the current content at the given wrapping width.
    ///
    /// An explicit width fixes the box width; otherwise the longest line
    /// decides it. Empty text still occupies one line.
    pub fn measure(&self, explicit_width: Option<f64>) -> Rect {
        let lines = self.lines(explicit_width);
        let height = lines.len().max(1) as f64 * self.line_height();
        let width = match explicit_width {
            Some(width) => width,
            None => {
                let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
                longest as f64 * self.advance()
            }
        };
        Rect::new(0.0, 0.0, width, height)
    }

    /// Recompute `bounding_rect` from the current content and width.
    pub fn refresh_bounds(&mut self) {
        self.bounding_rect = self.measure(self.explicit_width);
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn local_path(&self) -> BezPath {
        self.bounding_rect.to_path(0.1)
    }

    fn local_center(&self) -> Point {
        self.bounding_rect.center()
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn apply_settings(&mut self, settings: &UserSettings) {
        self.style.stroke_color = Some(settings.stroke_color().unwrap_or_else(SerializableColor::black));
        self.font_name = settings.font_name().to_string();
        self.font_size = settings.font_size();
        self.refresh_bounds();
    }

    fn render(&self, surface: &mut dyn Surface) {
        let color = self
            .style
            .stroke_color
            .unwrap_or_else(SerializableColor::black)
            .into();
        let content = self.lines(self.explicit_width).join("\n");
        surface.draw_text(&TextRun {
            content: &content,
            bounds: self.bounding_rect,
            transform: self.transform.affine(self.local_center()),
            font_name: &self.font_name,
            font_size: self.font_size,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(text: &str) -> Text {
        let mut shape = Text::new(text);
        // About 10 units per character.
        shape.font_size = 10.0 / ADVANCE_EM;
        shape
    }

    #[test]
    fn test_empty_text_is_one_line() {
        let text = sized("");
        let rect = text.measure(None);
        assert_eq!(rect.width(), 0.0);
        assert!((rect.height() - text.line_height()).abs() < 1e-9);
    }

    #[test]
    fn test_measure_grows_with_content() {
        let text = sized("hello\nhi");
        let rect = text.measure(None);
        assert!((rect.width() - 50.0).abs() < 1e-9);
        assert!((rect.height() - 2.0 * text.line_height()).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_at_explicit_width() {
        let text = sized("one two three");
        assert_eq!(text.lines(Some(85.0)), vec!["one two", "three"]);
        let rect = text.measure(Some(85.0));
        assert_eq!(rect.width(), 85.0);
        assert!((rect.height() - 2.0 * text.line_height()).abs() < 1e-9);
    }

    #[test]
    fn test_long_word_is_split() {
        let text = sized("abcdefgh");
        assert_eq!(text.lines(Some(35.0)), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_apply_settings_takes_font() {
        let settings = UserSettings::new(None, None, 3.0, "Courier", 12.0);
        let mut text = Text::new("abc");
        text.apply_settings(&settings);
        assert_eq!(text.font_name, "Courier");
        assert_eq!(text.font_size, 12.0);
        assert_eq!(text.style.stroke_color, Some(SerializableColor::black()));
        assert_eq!(text.bounding_rect, text.measure(None));
    }

    #[test]
    fn test_at_places_by_transform() {
        let text = Text::at(Point::new(5.0, 7.0), "x");
        assert_eq!(text.transform.translation.x, 5.0);
        assert_eq!(text.bounding_rect.origin(), Point::ZERO);
    }
}
