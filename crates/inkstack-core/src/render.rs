//! Rendering capability consumed by shapes and tools.
//!
//! The core never rasterizes anything itself. Hosts implement [`Surface`]
//! for their drawing backend; pen tools additionally need [`LayerSurface`]
//! so they can accumulate a stroke offscreen and composite it once.

use kurbo::{Affine, BezPath, Rect, Size};
use peniko::Color;
use std::any::Any;

/// How source pixels combine with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Paint over the destination.
    #[default]
    SourceOver,
    /// Remove destination coverage where the source is painted (erasing).
    DestinationOut,
}

/// Parameters for stroking a path.
#[derive(Debug, Clone)]
pub struct StrokeParams {
    pub color: Color,
    pub width: f64,
    /// Alternating on/off dash lengths. Empty = solid.
    pub dashes: Vec<f64>,
    pub mode: CompositeMode,
}

impl StrokeParams {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dashes: Vec::new(),
            mode: CompositeMode::SourceOver,
        }
    }

    pub fn with_dashes(mut self, dashes: &[f64]) -> Self {
        self.dashes = dashes.to_vec();
        self
    }

    pub fn with_mode(mut self, mode: CompositeMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A block of text to draw.
#[derive(Debug, Clone)]
pub struct TextRun<'a> {
    pub content: &'a str,
    /// Layout box in the text's local coordinates.
    pub bounds: Rect,
    /// Local-to-surface transform.
    pub transform: Affine,
    pub font_name: &'a str,
    pub font_size: f64,
    pub color: Color,
}

/// A 2D drawing surface.
pub trait Surface {
    /// Surface size in drawing units.
    fn size(&self) -> Size;

    /// Stroke a path.
    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeParams);

    /// Fill a path (non-zero winding).
    fn fill_path(&mut self, path: &BezPath, color: Color);

    /// Draw a block of text.
    fn draw_text(&mut self, text: &TextRun<'_>);
}

/// An offscreen buffer created by a [`LayerSurface`].
pub trait Layer: Surface + Any {
    /// Erase all content.
    fn clear(&mut self);

    /// Downcast support for [`LayerSurface::composite_layer`].
    fn as_any(&self) -> &dyn Any;
}

/// A surface that can create offscreen layers and blend them back.
pub trait LayerSurface: Surface {
    /// Create a transparent layer of the given size.
    fn create_layer(&self, size: Size) -> Box<dyn Layer>;

    /// Blend a layer over this surface, scaling its coverage by `alpha`.
    fn composite_layer(&mut self, layer: &dyn Layer, alpha: f64);
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording surface used by unit tests.

    use super::*;
    use crate::shapes::SerializableColor;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// A recorded drawing call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Stroke {
            target: &'static str,
            color: SerializableColor,
            width: f64,
            dashed: bool,
            mode: CompositeMode,
        },
        Fill {
            target: &'static str,
            color: SerializableColor,
        },
        Text {
            target: &'static str,
            content: String,
        },
        CreateLayer,
        ClearLayer,
        Composite {
            alpha: f64,
        },
    }

    /// Records every call into a shared log. Layers log into the same list.
    #[derive(Debug, Clone)]
    pub struct RecordingSurface {
        pub calls: Rc<RefCell<Vec<DrawCall>>>,
        target: &'static str,
    }

    impl RecordingSurface {
        pub fn new() -> Self {
            Self {
                calls: Rc::new(RefCell::new(Vec::new())),
                target: "surface",
            }
        }

        pub fn calls(&self) -> Vec<DrawCall> {
            self.calls.borrow().clone()
        }

        pub fn clear_calls(&self) {
            self.calls.borrow_mut().clear();
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> Size {
            Size::new(100.0, 100.0)
        }

        fn stroke_path(&mut self, _path: &BezPath, stroke: &StrokeParams) {
            self.calls.borrow_mut().push(DrawCall::Stroke {
                target: self.target,
                color: stroke.color.into(),
                width: stroke.width,
                dashed: !stroke.dashes.is_empty(),
                mode: stroke.mode,
            });
        }

        fn fill_path(&mut self, _path: &BezPath, color: Color) {
            self.calls.borrow_mut().push(DrawCall::Fill {
                target: self.target,
                color: color.into(),
            });
        }

        fn draw_text(&mut self, text: &TextRun<'_>) {
            self.calls.borrow_mut().push(DrawCall::Text {
                target: self.target,
                content: text.content.to_string(),
            });
        }
    }

    impl Layer for RecordingSurface {
        fn clear(&mut self) {
            self.calls.borrow_mut().push(DrawCall::ClearLayer);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    impl LayerSurface for RecordingSurface {
        fn create_layer(&self, _size: Size) -> Box<dyn Layer> {
            self.calls.borrow_mut().push(DrawCall::CreateLayer);
            Box::new(RecordingSurface {
                calls: Rc::clone(&self.calls),
                target: "layer",
            })
        }

        fn composite_layer(&mut self, _layer: &dyn Layer, alpha: f64) {
            self.calls.borrow_mut().push(DrawCall::Composite { alpha });
        }
    }
}
