//! Undo/redo history of operations.

use crate::drawing::Drawing;
use crate::error::DecodeResult;
use crate::operations::Operation;
use serde::{Deserialize, Serialize};

/// Applied operations (undo stack) and undone operations (redo stack),
/// newest last in both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingOperationStack {
    undo_stack: Vec<Operation>,
    redo_stack: Vec<Operation>,
}

impl DrawingOperationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an operation to the drawing and record it in history.
    ///
    /// The drawing is always mutated. The operation is normally pushed and
    /// the redo stack cleared; a text edit that coalesces with the add on
    /// top of the stack is folded into that add instead.
    pub fn apply(&mut self, drawing: &mut Drawing, operation: Operation) {
        operation.apply(drawing);

        if let Operation::EditText(edit) = &operation {
            if edit.coalesces_with(self.undo_stack.last()) {
                if let Some(Operation::AddShape(add)) = self.undo_stack.last_mut() {
                    if let Some(text) = add.shape.as_text_mut() {
                        text.text = edit.text.clone();
                        text.refresh_bounds();
                    }
                }
                log::debug!("Folded text edit into add of shape {}", edit.shape.id());
                return;
            }
        }

        log::debug!("Applied {} on shape {}", operation.name(), operation.shape_id());
        self.undo_stack.push(operation);
        self.redo_stack.clear();
    }

    /// Revert the newest applied operation. Returns false if there is none.
    pub fn undo(&mut self, drawing: &mut Drawing) -> bool {
        let Some(operation) = self.undo_stack.pop() else {
            return false;
        };
        operation.revert(drawing);
        log::debug!("Undid {} on shape {}", operation.name(), operation.shape_id());
        self.redo_stack.push(operation);
        true
    }

    /// Re-apply the newest undone operation. Returns false if there is none.
    pub fn redo(&mut self, drawing: &mut Drawing) -> bool {
        let Some(operation) = self.redo_stack.pop() else {
            return false;
        };
        operation.apply(drawing);
        log::debug!("Redid {} on shape {}", operation.name(), operation.shape_id());
        self.undo_stack.push(operation);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &[Operation] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Operation] {
        &self.redo_stack
    }

    /// Forget all history. The drawing is left as it is.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Serialize both stacks.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> DecodeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{
        AddShapeOperation, ChangeTransformOperation, EditTextOperation, RemoveShapeOperation,
    };
    use crate::shapes::{Rectangle, Shape, ShapeId, ShapeTransform, Text};
    use kurbo::{Point, Vec2};

    fn text_in(drawing: &Drawing, id: ShapeId) -> Option<String> {
        drawing.get(id).and_then(Shape::as_text).map(|t| t.text.clone())
    }

    fn rect() -> Shape {
        Shape::Rect(Rectangle::new(Point::ZERO, Point::new(10.0, 10.0)))
    }

    /// Replay the undo stack on an empty drawing of the same size.
    fn replay(stack: &DrawingOperationStack, drawing: &Drawing) -> Drawing {
        let mut replayed = Drawing::new(drawing.size());
        for operation in stack.undo_stack() {
            operation.apply(&mut replayed);
        }
        replayed
    }

    #[test]
    fn test_apply_pushes_and_clears_redo() {
        let mut drawing = Drawing::default();
        let mut stack = DrawingOperationStack::new();
        stack.apply(&mut drawing, AddShapeOperation::new(rect()).into());
        assert!(stack.undo(&mut drawing));
        assert!(stack.can_redo());

        stack.apply(&mut drawing, AddShapeOperation::new(rect()).into());
        assert!(!stack.can_redo());
        assert_eq!(stack.undo_stack().len(), 1);
    }

    #[test]
    fn test_empty_stack_is_a_no_op() {
        let mut drawing = Drawing::default();
        drawing.add(rect());
        let before = drawing.clone();
        let mut stack = DrawingOperationStack::new();
        assert!(!stack.undo(&mut drawing));
        assert!(!stack.redo(&mut drawing));
        assert_eq!(drawing, before);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut drawing = Drawing::default();
        let mut stack = DrawingOperationStack::new();
        let shape = rect();
        let id = shape.id();
        stack.apply(&mut drawing, AddShapeOperation::new(shape.clone()).into());
        let moved = ShapeTransform::translate(Vec2::new(3.0, 0.0));
        stack.apply(&mut drawing, ChangeTransformOperation::new(shape, moved).into());

        assert!(stack.undo(&mut drawing));
        assert!(drawing.get(id).unwrap().transform().is_identity());
        assert!(stack.undo(&mut drawing));
        assert!(drawing.is_empty());

        assert!(stack.redo(&mut drawing));
        assert!(stack.redo(&mut drawing));
        assert_eq!(drawing.get(id).unwrap().transform(), moved);
        assert!(!stack.redo(&mut drawing));
    }

    #[test]
    fn test_edit_after_add_coalesces() {
        let mut drawing = Drawing::default();
        let mut stack = DrawingOperationStack::new();
        let text = Text::new("");
        let id = Shape::Text(text.clone()).id();

        stack.apply(&mut drawing, AddShapeOperation::new(Shape::Text(text.clone())).into());
        stack.apply(&mut drawing, EditTextOperation::new(&text, "hello").into());

        assert_eq!(stack.undo_stack().len(), 1);
        assert_eq!(text_in(&drawing, id).as_deref(), Some("hello"));
        let Operation::AddShape(add) = &stack.undo_stack()[0] else {
            panic!("expected the add to stay on top");
        };
        assert_eq!(add.shape.as_text().unwrap().text, "hello");

        assert!(stack.undo(&mut drawing));
        assert!(!drawing.contains(id));

        // Redo brings the shape back with its final text.
        assert!(stack.redo(&mut drawing));
        assert_eq!(text_in(&drawing, id).as_deref(), Some("hello"));
    }

    #[test]
    fn test_edit_with_original_text_does_not_coalesce() {
        let mut drawing = Drawing::default();
        let mut stack = DrawingOperationStack::new();
        let text = Text::new("old");
        let id = Shape::Text(text.clone()).id();

        stack.apply(&mut drawing, AddShapeOperation::new(Shape::Text(text.clone())).into());
        stack.apply(&mut drawing, EditTextOperation::new(&text, "hello").into());
        assert_eq!(stack.undo_stack().len(), 2);

        assert!(stack.undo(&mut drawing));
        assert_eq!(text_in(&drawing, id).as_deref(), Some("old"));
        assert!(stack.undo(&mut drawing));
        assert!(!drawing.contains(id));
    }

    #[test]
    fn test_edit_of_other_shape_does_not_coalesce() {
        let mut drawing = Drawing::default();
        let mut stack = DrawingOperationStack::new();
        let first = Text::new("");
        let second = Text::new("");

        stack.apply(&mut drawing, AddShapeOperation::new(Shape::Text(first)).into());
        stack.apply(&mut drawing, AddShapeOperation::new(Shape::Text(second.clone())).into());
        let before = stack.undo_stack().len();
        stack.apply(&mut drawing, EditTextOperation::new(&second, "x").into());
        assert_eq!(stack.undo_stack().len(), before);

        // The first text is not on top any more.
        let mut stack = DrawingOperationStack::new();
        let mut drawing = Drawing::default();
        let first = Text::new("");
        stack.apply(&mut drawing, AddShapeOperation::new(Shape::Text(first.clone())).into());
        stack.apply(&mut drawing, AddShapeOperation::new(rect()).into());
        stack.apply(&mut drawing, EditTextOperation::new(&first, "y").into());
        assert_eq!(stack.undo_stack().len(), 3);
    }

    #[test]
    fn test_replay_reproduces_drawing() {
        let mut drawing = Drawing::default();
        let mut stack = DrawingOperationStack::new();
        let shapes = [rect(), rect(), rect()];
        let text = Text::new("");
        for shape in &shapes {
            stack.apply(&mut drawing, AddShapeOperation::new(shape.clone()).into());
        }
        stack.apply(&mut drawing, AddShapeOperation::new(Shape::Text(text.clone())).into());
        stack.apply(&mut drawing, EditTextOperation::new(&text, "typed").into());
        let remove = RemoveShapeOperation::from_drawing(&drawing, shapes[1].id()).unwrap();
        stack.apply(&mut drawing, remove.into());
        let moved = ShapeTransform::translate(Vec2::new(1.0, 2.0));
        stack.apply(&mut drawing, ChangeTransformOperation::new(shapes[2].clone(), moved).into());
        assert_eq!(replay(&stack, &drawing), drawing);

        stack.undo(&mut drawing);
        stack.undo(&mut drawing);
        assert_eq!(replay(&stack, &drawing), drawing);
        stack.redo(&mut drawing);
        assert_eq!(replay(&stack, &drawing), drawing);
    }

    #[test]
    fn test_stack_never_exceeds_applied_operations() {
        let mut drawing = Drawing::default();
        let mut stack = DrawingOperationStack::new();
        let mut recorded = 0;
        for step in 0..12 {
            match step % 4 {
                0 | 1 => {
                    stack.apply(&mut drawing, AddShapeOperation::new(rect()).into());
                    recorded += 1;
                    assert!(!stack.can_redo());
                }
                2 => {
                    stack.undo(&mut drawing);
                }
                _ => {
                    stack.redo(&mut drawing);
                }
            }
            assert!(stack.undo_stack().len() + stack.redo_stack().len() <= recorded);
        }
    }

    #[test]
    fn test_history_roundtrip() {
        let mut drawing = Drawing::default();
        let mut stack = DrawingOperationStack::new();
        stack.apply(&mut drawing, AddShapeOperation::new(rect()).into());
        stack.apply(&mut drawing, AddShapeOperation::new(rect()).into());
        stack.undo(&mut drawing);

        let json = stack.to_json().unwrap();
        let decoded = DrawingOperationStack::from_json(&json).unwrap();
        assert_eq!(decoded, stack);
        assert_eq!(decoded.redo_stack().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut drawing = Drawing::default();
        let mut stack = DrawingOperationStack::new();
        stack.apply(&mut drawing, AddShapeOperation::new(rect()).into());
        stack.clear();
        assert!(!stack.can_undo());
        assert_eq!(drawing.len(), 1);
    }
}
