//! Reversible edits applied to a [`Drawing`].
//!
//! Every operation carries a full snapshot of the shape it targets and
//! finds the live shape in the drawing by id. Operations never fail once
//! constructed; a target missing from the drawing is logged and skipped.

mod shape;
mod style;
mod text;
mod transform;

pub use shape::{AddShapeOperation, RemoveShapeOperation};
pub use style::{ChangeStyleOperation, TextFont};
pub use text::{ChangeExplicitWidthOperation, EditTextOperation};
pub use transform::ChangeTransformOperation;

use crate::drawing::Drawing;
use crate::error::{DecodeError, DecodeResult, read_tag};
use crate::shapes::{Shape, ShapeId};
use serde::{Deserialize, Deserializer, Serialize};

/// A reversible unit of edit history.
pub trait DrawingOperation {
    /// Perform the edit.
    fn apply(&self, drawing: &mut Drawing);

    /// Undo the edit. Only valid after [`DrawingOperation::apply`].
    fn revert(&self, drawing: &mut Drawing);

    /// Snapshot of the shape this operation targets.
    fn current_shape(&self) -> &Shape;
}

/// Mutate the live copy of `id`, logging when the shape is gone.
pub(crate) fn update_shape(
    drawing: &mut Drawing,
    id: ShapeId,
    operation: &'static str,
    f: impl FnOnce(&mut Shape),
) {
    if !drawing.update(id, f) {
        log::warn!("{operation}: shape {id} is not in the drawing");
    }
}

/// Every operation the history can hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    AddShape(AddShapeOperation),
    RemoveShape(RemoveShapeOperation),
    ChangeTransform(ChangeTransformOperation),
    EditText(EditTextOperation),
    ChangeExplicitWidth(ChangeExplicitWidthOperation),
    ChangeStyle(ChangeStyleOperation),
}

impl Operation {
    /// Decode an operation record by its `"op"` tag.
    pub fn from_value(value: serde_json::Value) -> DecodeResult<Self> {
        fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> DecodeResult<T> {
            serde_json::from_value(value).map_err(|source| DecodeError::Malformed {
                kind: "operation",
                source,
            })
        }

        let tag = read_tag(&value, "operation", "op")?.to_string();
        match tag.as_str() {
            "add_shape" => decode(value).map(Operation::AddShape),
            "remove_shape" => decode(value).map(Operation::RemoveShape),
            "change_transform" => decode(value).map(Operation::ChangeTransform),
            "edit_text" => decode(value).map(Operation::EditText),
            "change_explicit_width" => decode(value).map(Operation::ChangeExplicitWidth),
            "change_style" => decode(value).map(Operation::ChangeStyle),
            _ => Err(DecodeError::UnknownOperation(tag)),
        }
    }

    pub fn from_json(json: &str) -> DecodeResult<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn as_operation(&self) -> &dyn DrawingOperation {
        match self {
            Operation::AddShape(op) => op,
            Operation::RemoveShape(op) => op,
            Operation::ChangeTransform(op) => op,
            Operation::EditText(op) => op,
            Operation::ChangeExplicitWidth(op) => op,
            Operation::ChangeStyle(op) => op,
        }
    }

    pub fn apply(&self, drawing: &mut Drawing) {
        self.as_operation().apply(drawing);
    }

    pub fn revert(&self, drawing: &mut Drawing) {
        self.as_operation().revert(drawing);
    }

    pub fn current_shape(&self) -> &Shape {
        self.as_operation().current_shape()
    }

    /// Id of the targeted shape.
    pub fn shape_id(&self) -> ShapeId {
        self.current_shape().id()
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::AddShape(_) => "add_shape",
            Operation::RemoveShape(_) => "remove_shape",
            Operation::ChangeTransform(_) => "change_transform",
            Operation::EditText(_) => "edit_text",
            Operation::ChangeExplicitWidth(_) => "change_explicit_width",
            Operation::ChangeStyle(_) => "change_style",
        }
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Operation::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl From<AddShapeOperation> for Operation {
    fn from(op: AddShapeOperation) -> Self {
        Operation::AddShape(op)
    }
}

impl From<RemoveShapeOperation> for Operation {
    fn from(op: RemoveShapeOperation) -> Self {
        Operation::RemoveShape(op)
    }
}

impl From<ChangeTransformOperation> for Operation {
    fn from(op: ChangeTransformOperation) -> Self {
        Operation::ChangeTransform(op)
    }
}

impl From<EditTextOperation> for Operation {
    fn from(op: EditTextOperation) -> Self {
        Operation::EditText(op)
    }
}

impl From<ChangeExplicitWidthOperation> for Operation {
    fn from(op: ChangeExplicitWidthOperation) -> Self {
        Operation::ChangeExplicitWidth(op)
    }
}

impl From<ChangeStyleOperation> for Operation {
    fn from(op: ChangeStyleOperation) -> Self {
        Operation::ChangeStyle(op)
    }
}
