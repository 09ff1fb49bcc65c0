//! inkstack core library
//!
//! Platform-agnostic shapes, reversible operations, undo history and the
//! gesture-driven drawing tools of the inkstack editor.

pub mod drawing;
pub mod editor;
pub mod error;
pub mod operations;
pub mod render;
pub mod settings;
pub mod shapes;
pub mod stack;
pub mod tools;

pub use drawing::{Drawing, DrawingEvent};
pub use editor::Editor;
pub use error::{DecodeError, DecodeResult};
pub use operations::{DrawingOperation, Operation};
pub use render::{CompositeMode, Layer, LayerSurface, StrokeParams, Surface, TextRun};
pub use settings::{SettingsChange, SettingsProfile, ToolSettings, UserSettings};
pub use shapes::{Shape, ShapeId, ShapeStyle, ShapeTransform};
pub use stack::DrawingOperationStack;
pub use tools::{DrawingTool, ToolKind, ToolOperationContext};
