//! Tools that turn pointer gestures into shapes and operations.
//!
//! Every tool follows the same gesture state machine: a drag starts an
//! in-progress shape, drag updates change only that shape, and the drag end
//! commits it through the operation stack. Taps and cancels are tool specific.

mod pen;
mod text;
mod two_point;

pub use pen::{CommitPolicy, PenTool, modulated_width};
pub use text::TextTool;
pub use two_point::{TwoPointKind, TwoPointTool};

use crate::drawing::Drawing;
use crate::operations::Operation;
use crate::render::LayerSurface;
use crate::settings::{ToolSettings, UserSettings};
use crate::shapes::{Ngon, Shape, Star, deserialize_vertex_count};
use crate::stack::DrawingOperationStack;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Everything a tool may touch while handling a gesture.
pub struct ToolOperationContext<'a> {
    pub drawing: &'a mut Drawing,
    pub operation_stack: &'a mut DrawingOperationStack,
    pub user_settings: &'a UserSettings,
    pub tool_settings: &'a mut ToolSettings,
}

impl ToolOperationContext<'_> {
    /// Apply an operation through the history and mark the drawing dirty.
    pub fn apply(&mut self, operation: Operation) {
        self.operation_stack.apply(self.drawing, operation);
        self.tool_settings.is_persistent_buffer_dirty = true;
    }
}

/// A gesture handler that builds one shape at a time.
pub trait DrawingTool {
    /// Display name.
    fn name(&self) -> &'static str;

    /// Whether the tool changes the committed drawing while dragging, so
    /// the host must re-render it on every update.
    fn is_progressive(&self) -> bool {
        false
    }

    fn handle_tap(&mut self, _ctx: &mut ToolOperationContext<'_>, _point: Point) {}

    fn handle_drag_start(&mut self, ctx: &mut ToolOperationContext<'_>, point: Point);

    fn handle_drag_continue(&mut self, ctx: &mut ToolOperationContext<'_>, point: Point, velocity: Vec2);

    fn handle_drag_end(&mut self, ctx: &mut ToolOperationContext<'_>, point: Point);

    /// There is no true cancel: a cancelled drag still finalizes the shape.
    fn handle_drag_cancel(&mut self, ctx: &mut ToolOperationContext<'_>, point: Point) {
        self.handle_drag_end(ctx, point);
    }

    /// Draw the shape being built on top of the committed drawing.
    fn render_shape_in_progress(&mut self, surface: &mut dyn LayerSurface);

    /// The surface was just repainted from the committed drawing, so
    /// anything drawn onto it directly during this drag is gone.
    fn surface_repainted(&mut self) {}

    /// Re-derive settings from `ctx.user_settings` and restyle the shape in progress.
    fn apply_settings(&mut self, ctx: &mut ToolOperationContext<'_>);

    fn shape_in_progress(&self) -> Option<&Shape>;

    /// Called before another tool replaces this one.
    fn deactivate(&mut self, _ctx: &mut ToolOperationContext<'_>) {}

    /// A finished shape the tool did not commit itself.
    fn take_finished_shape(&mut self) -> Option<Shape> {
        None
    }

    /// Access to text editing when this is the text tool.
    fn as_text_tool(&mut self) -> Option<&mut TextTool> {
        None
    }
}

fn default_sides() -> u32 {
    Ngon::DEFAULT_SIDES
}

fn default_points() -> u32 {
    Star::DEFAULT_POINTS
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolKind {
    Rect,
    Line,
    Ellipse,
    Ngon {
        #[serde(default = "default_sides", deserialize_with = "deserialize_vertex_count")]
        sides: u32,
    },
    Star {
        #[serde(default = "default_points", deserialize_with = "deserialize_vertex_count")]
        points: u32,
    },
    #[default]
    Pen,
    Eraser,
    FixedPen,
    HighlightPen,
    DashedPen,
    Text,
}

impl ToolKind {
    /// Build a fresh tool of this kind.
    pub fn create(self) -> Box<dyn DrawingTool> {
        match self {
            ToolKind::Rect => Box::new(TwoPointTool::new(TwoPointKind::Rect)),
            ToolKind::Line => Box::new(TwoPointTool::new(TwoPointKind::Line)),
            ToolKind::Ellipse => Box::new(TwoPointTool::new(TwoPointKind::Ellipse)),
            ToolKind::Ngon { sides } => Box::new(TwoPointTool::new(TwoPointKind::Ngon { sides })),
            ToolKind::Star { points } => Box::new(TwoPointTool::new(TwoPointKind::Star { points })),
            ToolKind::Pen => Box::new(PenTool::pen()),
            ToolKind::Eraser => Box::new(PenTool::eraser()),
            ToolKind::FixedPen => Box::new(PenTool::fixed_pen()),
            ToolKind::HighlightPen => Box::new(PenTool::highlight_pen()),
            ToolKind::DashedPen => Box::new(PenTool::dashed_pen()),
            ToolKind::Text => Box::new(TextTool::new()),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared gesture fixtures for tool tests.

    use super::*;

    /// Owns everything a [`ToolOperationContext`] borrows.
    #[derive(Default)]
    pub struct Session {
        pub drawing: Drawing,
        pub stack: DrawingOperationStack,
        pub settings: UserSettings,
        pub tool_settings: ToolSettings,
    }

    impl Session {
        pub fn ctx(&mut self) -> ToolOperationContext<'_> {
            ToolOperationContext {
                drawing: &mut self.drawing,
                operation_stack: &mut self.stack,
                user_settings: &self.settings,
                tool_settings: &mut self.tool_settings,
            }
        }

        /// Drag through `points`, continuing at zero velocity.
        pub fn drag(&mut self, tool: &mut dyn DrawingTool, points: &[Point]) {
            let Some((first, rest)) = points.split_first() else {
                return;
            };
            tool.handle_drag_start(&mut self.ctx(), *first);
            for point in rest {
                tool.handle_drag_continue(&mut self.ctx(), *point, Vec2::ZERO);
            }
            let last = rest.last().unwrap_or(first);
            tool.handle_drag_end(&mut self.ctx(), *last);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_kind_names() {
        let names: Vec<&str> = [
            ToolKind::Rect,
            ToolKind::Ngon { sides: 6 },
            ToolKind::Pen,
            ToolKind::Eraser,
            ToolKind::DashedPen,
            ToolKind::Text,
        ]
        .into_iter()
        .map(|kind| kind.create().name())
        .collect();
        assert_eq!(names, vec!["Rect", "Ngon", "Pen", "Eraser", "DashedPen", "Text"]);
    }

    #[test]
    fn test_tool_kind_deserialize() {
        let kind: ToolKind = serde_json::from_str(r#"{ "tool": "star" }"#).unwrap();
        assert_eq!(kind, ToolKind::Star { points: 5 });
        let kind: ToolKind = serde_json::from_str(r#"{ "tool": "ngon", "sides": 8 }"#).unwrap();
        assert_eq!(kind, ToolKind::Ngon { sides: 8 });
        let kind: ToolKind = serde_json::from_str(r#"{ "tool": "highlight_pen" }"#).unwrap();
        assert_eq!(kind, ToolKind::HighlightPen);
        assert!(serde_json::from_str::<ToolKind>(r#"{ "tool": "star", "points": 3000000000 }"#).is_err());
    }

    #[test]
    fn test_only_eraser_is_progressive() {
        assert!(ToolKind::Eraser.create().is_progressive());
        assert!(!ToolKind::Pen.create().is_progressive());
        assert!(!ToolKind::Rect.create().is_progressive());
    }
}
