//! Moving, rotating and scaling shapes.

use super::{DrawingOperation, update_shape};
use crate::drawing::Drawing;
use crate::shapes::{Shape, ShapeTransform};
use serde::{Deserialize, Serialize};

/// Replace a shape's transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeTransformOperation {
    pub shape: Shape,
    pub transform: ShapeTransform,
    pub original_transform: ShapeTransform,
}

impl ChangeTransformOperation {
    /// Change `shape` to `transform`, remembering its current transform.
    pub fn new(shape: Shape, transform: ShapeTransform) -> Self {
        let original_transform = shape.transform();
        Self {
            shape,
            transform,
            original_transform,
        }
    }

    fn set(&self, drawing: &mut Drawing, transform: ShapeTransform) {
        update_shape(drawing, self.shape.id(), "change_transform", |shape| {
            shape.as_transform_mut().set_transform(transform);
        });
    }
}

impl DrawingOperation for ChangeTransformOperation {
    fn apply(&self, drawing: &mut Drawing) {
        self.set(drawing, self.transform);
    }

    fn revert(&self, drawing: &mut Drawing) {
        self.set(drawing, self.original_transform);
    }

    fn current_shape(&self) -> &Shape {
        &self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Text;
    use kurbo::Vec2;

    #[test]
    fn test_change_transform() {
        let mut drawing = Drawing::default();
        let shape = Shape::Text(Text::new("moved"));
        let id = shape.id();
        drawing.add(shape.clone());

        let moved = ShapeTransform::translate(Vec2::new(30.0, 40.0));
        let op = ChangeTransformOperation::new(shape, moved);
        assert!(op.original_transform.is_identity());

        op.apply(&mut drawing);
        assert_eq!(drawing.get(id).unwrap().transform(), moved);
        op.revert(&mut drawing);
        assert!(drawing.get(id).unwrap().transform().is_identity());
    }
}
