//! Text content and wrapping width edits.

use super::{DrawingOperation, Operation, update_shape};
use crate::drawing::Drawing;
use crate::shapes::{Shape, Text};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Replace the content of a text shape.
///
/// The layout box is re-measured for the new content at the shape's
/// current wrapping width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditTextOperation {
    pub shape: Shape,
    pub text: String,
    pub original_text: String,
}

impl EditTextOperation {
    /// Edit `shape` to read `text`, remembering its current content.
    pub fn new(shape: &Text, text: impl Into<String>) -> Self {
        Self {
            original_text: shape.text.clone(),
            text: text.into(),
            shape: Shape::Text(shape.clone()),
        }
    }

    /// Whether this edit should be folded into `previous` instead of
    /// becoming its own history entry.
    ///
    /// True only for the first edit of a text that was just added empty:
    /// the original text is empty and `previous` adds this very shape.
    pub fn coalesces_with(&self, previous: Option<&Operation>) -> bool {
        if !self.original_text.is_empty() {
            return false;
        }
        matches!(previous, Some(Operation::AddShape(add)) if add.shape.id() == self.shape.id())
    }

    fn set(&self, drawing: &mut Drawing, text: &str) {
        update_shape(drawing, self.shape.id(), "edit_text", |shape| match shape.as_text_mut() {
            Some(shape) => {
                shape.text = text.to_string();
                shape.refresh_bounds();
            }
            None => log::warn!("edit_text: shape {} is a {}", shape.id(), shape.kind()),
        });
    }
}

impl DrawingOperation for EditTextOperation {
    fn apply(&self, drawing: &mut Drawing) {
        self.set(drawing, &self.text);
    }

    fn revert(&self, drawing: &mut Drawing) {
        self.set(drawing, &self.original_text);
    }

    fn current_shape(&self) -> &Shape {
        &self.shape
    }
}

/// Change the wrapping width of a text shape together with its layout box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeExplicitWidthOperation {
    pub shape: Shape,
    pub width: Option<f64>,
    pub bounding_rect: Rect,
    pub original_width: Option<f64>,
    pub original_bounding_rect: Rect,
}

impl ChangeExplicitWidthOperation {
    /// Resize `shape` to `width`, measuring the new layout box.
    pub fn resize(shape: &Text, width: Option<f64>) -> Self {
        Self {
            width,
            bounding_rect: shape.measure(width),
            original_width: shape.explicit_width,
            original_bounding_rect: shape.bounding_rect,
            shape: Shape::Text(shape.clone()),
        }
    }

    fn set(&self, drawing: &mut Drawing, width: Option<f64>, rect: Rect) {
        update_shape(drawing, self.shape.id(), "change_explicit_width", |shape| {
            match shape.as_text_mut() {
                Some(text) => {
                    text.explicit_width = width;
                    text.bounding_rect = rect;
                }
                None => log::warn!(
                    "change_explicit_width: shape {} is a {}",
                    shape.id(),
                    shape.kind()
                ),
            }
        });
    }
}

impl DrawingOperation for ChangeExplicitWidthOperation {
    fn apply(&self, drawing: &mut Drawing) {
        self.set(drawing, self.width, self.bounding_rect);
    }

    fn revert(&self, drawing: &mut Drawing) {
        self.set(drawing, self.original_width, self.original_bounding_rect);
    }

    fn current_shape(&self) -> &Shape {
        &self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::AddShapeOperation;
    use crate::shapes::{Rectangle, ShapeTrait};
    use kurbo::Point;

    #[test]
    fn test_edit_text() {
        let mut drawing = Drawing::default();
        let text = Text::new("before");
        let id = text.id();
        drawing.add(Shape::Text(text.clone()));

        let op = EditTextOperation::new(&text, "after");
        op.apply(&mut drawing);
        let live = drawing.get(id).and_then(Shape::as_text).unwrap();
        assert_eq!(live.text, "after");
        assert!(live.bounding_rect.width() < text.bounding_rect.width());
        op.revert(&mut drawing);
        assert_eq!(drawing.get(id), Some(&Shape::Text(text)));
    }

    #[test]
    fn test_edit_text_on_other_shape_changes_nothing() {
        let mut drawing = Drawing::default();
        let rect = Shape::Rect(Rectangle::new(Point::ZERO, Point::new(4.0, 4.0)));
        drawing.add(rect.clone());
        let mut op = EditTextOperation::new(&Text::new(""), "x");
        op.shape = rect.clone();
        op.apply(&mut drawing);
        assert_eq!(drawing.get(rect.id()), Some(&rect));
    }

    #[test]
    fn test_coalesces_only_with_add_of_same_shape() {
        let text = Text::new("");
        let add = Operation::from(AddShapeOperation::new(Shape::Text(text.clone())));
        let edit = EditTextOperation::new(&text, "hello");
        assert!(edit.coalesces_with(Some(&add)));
        assert!(!edit.coalesces_with(None));

        // Same field values, different identity.
        let twin = Text::new("");
        let twin_add = Operation::from(AddShapeOperation::new(Shape::Text(twin)));
        assert!(!edit.coalesces_with(Some(&twin_add)));

        let mut typed = text.clone();
        typed.text = "old".into();
        let second_edit = EditTextOperation::new(&typed, "new");
        assert!(!second_edit.coalesces_with(Some(&add)));
    }

    #[test]
    fn test_coalesce_needs_add_on_top() {
        let text = Text::new("");
        let edit = EditTextOperation::new(&text, "a");
        let previous = Operation::from(EditTextOperation::new(&text, ""));
        assert!(!edit.coalesces_with(Some(&previous)));
    }

    #[test]
    fn test_change_explicit_width() {
        let mut drawing = Drawing::default();
        let text = Text::new("some words to wrap");
        let id = text.id();
        let original_rect = text.bounding_rect;
        drawing.add(Shape::Text(text.clone()));

        let op = ChangeExplicitWidthOperation::resize(&text, Some(60.0));
        assert_eq!(op.original_width, None);
        assert_eq!(op.bounding_rect.width(), 60.0);

        op.apply(&mut drawing);
        let live = drawing.get(id).and_then(Shape::as_text).unwrap();
        assert_eq!(live.explicit_width, Some(60.0));
        assert_eq!(live.bounding_rect, op.bounding_rect);
        assert!(live.bounding_rect.height() > original_rect.height());

        op.revert(&mut drawing);
        let live = drawing.get(id).and_then(Shape::as_text).unwrap();
        assert_eq!(live.explicit_width, None);
        assert_eq!(live.bounding_rect, original_rect);
    }
}
