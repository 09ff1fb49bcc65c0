//! Tool for placing and editing text.

use super::{DrawingTool, ToolOperationContext};
use crate::operations::{AddShapeOperation, ChangeExplicitWidthOperation, EditTextOperation};
use crate::render::LayerSurface;
use crate::shapes::{Shape, ShapeId, ShapeTrait, Text};
use kurbo::{Point, Vec2};

/// Tap to place a text box, then edit it until the next tap.
///
/// Placing commits an empty text right away. The first edit of that text
/// folds into the add, so undo removes the box with its content in one step.
#[derive(Debug, Clone, Default)]
pub struct TextTool {
    editing: Option<ShapeId>,
}

impl TextTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The text currently being edited.
    pub fn editing(&self) -> Option<ShapeId> {
        self.editing
    }

    fn edited_text<'a>(&self, ctx: &'a ToolOperationContext<'_>) -> Option<&'a Text> {
        let id = self.editing?;
        ctx.drawing.get(id).and_then(Shape::as_text)
    }

    /// Replace the content of the edited text. Returns false if nothing is
    /// being edited or the content is unchanged.
    pub fn set_text(&mut self, ctx: &mut ToolOperationContext<'_>, content: &str) -> bool {
        let Some(text) = self.edited_text(ctx) else {
            log::warn!("Text: no text is being edited");
            return false;
        };
        if text.text == content {
            return false;
        }
        let operation = EditTextOperation::new(text, content);
        ctx.apply(operation.into());
        true
    }

    /// Change the wrapping width of the edited text.
    pub fn set_explicit_width(&mut self, ctx: &mut ToolOperationContext<'_>, width: Option<f64>) -> bool {
        let Some(text) = self.edited_text(ctx) else {
            log::warn!("Text: no text is being edited");
            return false;
        };
        if text.explicit_width == width {
            return false;
        }
        let operation = ChangeExplicitWidthOperation::resize(text, width);
        ctx.apply(operation.into());
        true
    }

    /// Stop editing without placing a new text.
    pub fn end_editing(&mut self, ctx: &mut ToolOperationContext<'_>) {
        if let Some(id) = self.editing.take() {
            log::debug!("Text: finished editing {id}");
            if ctx.tool_settings.selected_shape == Some(id) {
                ctx.tool_settings.selected_shape = None;
            }
        }
    }
}

impl DrawingTool for TextTool {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn handle_tap(&mut self, ctx: &mut ToolOperationContext<'_>, point: Point) {
        if self.editing.is_some() {
            self.end_editing(ctx);
            return;
        }
        let mut text = Text::at(point, "");
        text.apply_settings(ctx.user_settings);
        let id = text.id();
        ctx.apply(AddShapeOperation::new(Shape::Text(text)).into());
        ctx.tool_settings.selected_shape = Some(id);
        self.editing = Some(id);
    }

    fn handle_drag_start(&mut self, _ctx: &mut ToolOperationContext<'_>, _point: Point) {}

    fn handle_drag_continue(&mut self, _ctx: &mut ToolOperationContext<'_>, _point: Point, _velocity: Vec2) {}

    fn handle_drag_end(&mut self, _ctx: &mut ToolOperationContext<'_>, _point: Point) {}

    /// Drags do nothing, so a cancelled drag is not a tap either.
    fn handle_drag_cancel(&mut self, _ctx: &mut ToolOperationContext<'_>, _point: Point) {}

    fn render_shape_in_progress(&mut self, _surface: &mut dyn LayerSurface) {}

    fn apply_settings(&mut self, ctx: &mut ToolOperationContext<'_>) {
        ctx.tool_settings.is_persistent_buffer_dirty = true;
    }

    fn shape_in_progress(&self) -> Option<&Shape> {
        None
    }

    fn deactivate(&mut self, ctx: &mut ToolOperationContext<'_>) {
        self.end_editing(ctx);
    }

    fn as_text_tool(&mut self) -> Option<&mut TextTool> {
        Some(self)
    }
}
