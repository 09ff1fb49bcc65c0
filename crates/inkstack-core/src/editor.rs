//! Editing session: drawing, history, settings and the active tool.

use crate::drawing::{Drawing, DrawingEvent};
use crate::operations::{ChangeStyleOperation, RemoveShapeOperation};
use crate::render::LayerSurface;
use crate::settings::{SettingsChange, ToolSettings, UserSettings};
use crate::shapes::{Shape, ShapeId};
use crate::stack::DrawingOperationStack;
use crate::tools::{DrawingTool, ToolKind, ToolOperationContext};
use kurbo::{Point, Size, Vec2};

/// Runtime editing state for one drawing.
///
/// Hosts forward pointer gestures here and poll [`Editor::take_dirty`] to
/// learn when the committed drawing must be re-rendered.
pub struct Editor {
    drawing: Drawing,
    operation_stack: DrawingOperationStack,
    user_settings: UserSettings,
    tool_settings: ToolSettings,
    tool_kind: ToolKind,
    tool: Box<dyn DrawingTool>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::with_drawing(Drawing::default())
    }
}

impl Editor {
    /// Create an editor with an empty drawing of the given size.
    pub fn new(size: Size) -> Self {
        Self::with_drawing(Drawing::new(size))
    }

    /// Create an editor for an existing drawing. History starts empty.
    pub fn with_drawing(drawing: Drawing) -> Self {
        let tool_kind = ToolKind::default();
        Self {
            drawing,
            operation_stack: DrawingOperationStack::new(),
            user_settings: UserSettings::default(),
            tool_settings: ToolSettings::default(),
            tool_kind,
            tool: tool_kind.create(),
        }
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    pub fn operation_stack(&self) -> &DrawingOperationStack {
        &self.operation_stack
    }

    pub fn user_settings(&self) -> &UserSettings {
        &self.user_settings
    }

    pub fn tool_settings(&self) -> &ToolSettings {
        &self.tool_settings
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.tool_kind
    }

    pub fn tool_name(&self) -> &'static str {
        self.tool.name()
    }

    /// Whether the committed drawing changes during a drag with this tool.
    pub fn is_progressive(&self) -> bool {
        self.tool.is_progressive()
    }

    fn with_tool<R>(&mut self, f: impl FnOnce(&mut dyn DrawingTool, &mut ToolOperationContext<'_>) -> R) -> R {
        let mut ctx = ToolOperationContext {
            drawing: &mut self.drawing,
            operation_stack: &mut self.operation_stack,
            user_settings: &self.user_settings,
            tool_settings: &mut self.tool_settings,
        };
        f(&mut *self.tool, &mut ctx)
    }

    /// Switch tools. The old tool is deactivated and any shape it had in
    /// progress is dropped.
    pub fn set_tool(&mut self, kind: ToolKind) {
        if kind == self.tool_kind {
            return;
        }
        self.with_tool(|tool, ctx| {
            if tool.shape_in_progress().is_some() {
                log::debug!("{}: dropping shape in progress", tool.name());
            }
            tool.deactivate(ctx);
        });
        self.tool_kind = kind;
        self.tool = kind.create();
        log::debug!("Tool changed to {}", self.tool.name());
    }

    pub fn tap(&mut self, point: Point) {
        self.with_tool(|tool, ctx| tool.handle_tap(ctx, point));
    }

    pub fn drag_start(&mut self, point: Point) {
        self.with_tool(|tool, ctx| tool.handle_drag_start(ctx, point));
    }

    pub fn drag_continue(&mut self, point: Point, velocity: Vec2) {
        self.with_tool(|tool, ctx| tool.handle_drag_continue(ctx, point, velocity));
    }

    pub fn drag_end(&mut self, point: Point) {
        self.with_tool(|tool, ctx| tool.handle_drag_end(ctx, point));
    }

    pub fn drag_cancel(&mut self, point: Point) {
        self.with_tool(|tool, ctx| tool.handle_drag_cancel(ctx, point));
    }

    pub fn shape_in_progress(&self) -> Option<&Shape> {
        self.tool.shape_in_progress()
    }

    /// A shape the active tool finished without committing it.
    pub fn take_finished_shape(&mut self) -> Option<Shape> {
        self.tool.take_finished_shape()
    }

    /// Replace the content of the text being edited.
    pub fn set_text(&mut self, content: &str) -> bool {
        self.with_tool(|tool, ctx| {
            let name = tool.name();
            match tool.as_text_tool() {
                Some(text_tool) => text_tool.set_text(ctx, content),
                None => {
                    log::warn!("{name}: tool does not edit text");
                    false
                }
            }
        })
    }

    /// Change the wrapping width of the text being edited.
    pub fn set_text_width(&mut self, width: Option<f64>) -> bool {
        self.with_tool(|tool, ctx| {
            let name = tool.name();
            match tool.as_text_tool() {
                Some(text_tool) => text_tool.set_explicit_width(ctx, width),
                None => {
                    log::warn!("{name}: tool does not edit text");
                    false
                }
            }
        })
    }

    /// Change the ambient settings, then let the active tool restyle its
    /// shape in progress.
    pub fn update_settings(&mut self, f: impl FnOnce(&mut UserSettings)) {
        f(&mut self.user_settings);
        self.with_tool(|tool, ctx| tool.apply_settings(ctx));
    }

    /// Settings changes since the last call, for refreshing host controls.
    pub fn drain_settings_changes(&mut self) -> Vec<SettingsChange> {
        self.user_settings.drain_changes()
    }

    /// Select a shape as the target of style changes.
    pub fn select(&mut self, id: ShapeId) -> bool {
        if !self.drawing.contains(id) {
            log::warn!("Cannot select missing shape {id}");
            return false;
        }
        self.tool_settings.selected_shape = Some(id);
        true
    }

    pub fn selected_shape(&self) -> Option<ShapeId> {
        self.tool_settings.selected_shape
    }

    /// Restyle the selected shape from the ambient stroke, fill and width,
    /// and the ambient font for text. Returns false when nothing is selected
    /// or nothing would change.
    pub fn apply_settings_to_selection(&mut self) -> bool {
        let Some(id) = self.tool_settings.selected_shape else {
            return false;
        };
        let Some(shape) = self.drawing.get(id) else {
            log::warn!("Selected shape {id} is not in the drawing");
            return false;
        };
        let mut restyled = shape.clone();
        restyled.apply_settings(&self.user_settings);
        let Some(operation) = ChangeStyleOperation::between(shape, &restyled) else {
            return false;
        };
        self.operation_stack.apply(&mut self.drawing, operation.into());
        self.tool_settings.is_persistent_buffer_dirty = true;
        true
    }

    /// Remove the selected shape undoably.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.tool_settings.selected_shape.take() else {
            return false;
        };
        let Some(operation) = RemoveShapeOperation::from_drawing(&self.drawing, id) else {
            log::warn!("Selected shape {id} is not in the drawing");
            return false;
        };
        self.operation_stack.apply(&mut self.drawing, operation.into());
        self.tool_settings.is_persistent_buffer_dirty = true;
        true
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.operation_stack.undo(&mut self.drawing);
        self.tool_settings.is_persistent_buffer_dirty |= undone;
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.operation_stack.redo(&mut self.drawing);
        self.tool_settings.is_persistent_buffer_dirty |= redone;
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.operation_stack.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.operation_stack.can_redo()
    }

    /// Both history stacks as pretty JSON.
    pub fn history_json(&self) -> Result<String, serde_json::Error> {
        self.operation_stack.to_json()
    }

    /// Read and clear the "drawing must be re-rendered" flag.
    pub fn take_dirty(&mut self) -> bool {
        self.tool_settings.take_dirty()
    }

    pub fn drain_events(&mut self) -> Vec<DrawingEvent> {
        self.drawing.drain_events()
    }

    /// Draw a full frame onto a cleared surface: the committed drawing,
    /// then the active tool's shape in progress.
    pub fn render(&mut self, surface: &mut dyn LayerSurface) {
        self.drawing.render(surface);
        self.tool.surface_repainted();
        self.tool.render_shape_in_progress(surface);
    }
}
