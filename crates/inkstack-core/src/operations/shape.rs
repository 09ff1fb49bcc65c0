//! Adding and removing shapes.

use super::DrawingOperation;
use crate::drawing::Drawing;
use crate::shapes::{Shape, ShapeId};
use serde::{Deserialize, Serialize};

/// Put a shape into the drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddShapeOperation {
    pub shape: Shape,
}

impl AddShapeOperation {
    pub fn new(shape: Shape) -> Self {
        Self { shape }
    }
}

impl DrawingOperation for AddShapeOperation {
    fn apply(&self, drawing: &mut Drawing) {
        drawing.add(self.shape.clone());
    }

    fn revert(&self, drawing: &mut Drawing) {
        if drawing.remove(self.shape.id()).is_none() {
            log::warn!("add_shape: shape {} already gone", self.shape.id());
        }
    }

    fn current_shape(&self) -> &Shape {
        &self.shape
    }
}

/// Take a shape out of the drawing.
///
/// Reverting puts it back at the z-index it had, when that is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveShapeOperation {
    pub shape: Shape,
    #[serde(default)]
    pub index: Option<usize>,
}

impl RemoveShapeOperation {
    pub fn new(shape: Shape) -> Self {
        Self { shape, index: None }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Snapshot the live shape and its z-index. None if `id` is not in the drawing.
    pub fn from_drawing(drawing: &Drawing, id: ShapeId) -> Option<Self> {
        let shape = drawing.get(id)?.clone();
        Some(Self {
            shape,
            index: drawing.index_of(id),
        })
    }
}

impl DrawingOperation for RemoveShapeOperation {
    fn apply(&self, drawing: &mut Drawing) {
        if drawing.remove(self.shape.id()).is_none() {
            log::warn!("remove_shape: shape {} is not in the drawing", self.shape.id());
        }
    }

    fn revert(&self, drawing: &mut Drawing) {
        let index = self.index.unwrap_or(drawing.len());
        drawing.insert_at(self.shape.clone(), index);
    }

    fn current_shape(&self) -> &Shape {
        &self.shape
    }
}
