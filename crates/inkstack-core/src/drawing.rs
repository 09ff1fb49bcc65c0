//! The shape container that operations act on.

use crate::render::LayerSurface;
use crate::shapes::{Shape, ShapeId};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default canvas size for a new drawing.
pub const DEFAULT_SIZE: Size = Size::new(1024.0, 768.0);

/// Change notifications for the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingEvent {
    Added(ShapeId),
    Removed(ShapeId),
    /// An existing shape's fields changed; its position in z-order did not.
    Updated(ShapeId),
}

/// Shapes keyed by id, plus their z-order (back to front).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drawing {
    /// Canvas size, used to size offscreen layers.
    size: Size,
    shapes: HashMap<ShapeId, Shape>,
    z_order: Vec<ShapeId>,
    #[serde(skip)]
    events: Vec<DrawingEvent>,
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl PartialEq for Drawing {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.z_order == other.z_order && self.shapes == other.shapes
    }
}

impl Drawing {
    /// Create an empty drawing.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            shapes: HashMap::new(),
            z_order: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Add a shape on top of all others.
    ///
    /// A shape whose id is already present replaces the stored one in place.
    pub fn add(&mut self, shape: Shape) {
        let index = self.z_order.len();
        self.insert_at(shape, index);
    }

    /// Insert a shape at `index` in z-order (clamped to the top).
    pub fn insert_at(&mut self, shape: Shape, index: usize) {
        let id = shape.id();
        if self.shapes.insert(id, shape).is_some() {
            log::warn!("Shape {id} already in drawing, replacing it");
            self.events.push(DrawingEvent::Updated(id));
            return;
        }
        let index = index.min(self.z_order.len());
        self.z_order.insert(index, id);
        log::trace!("Added shape {id} at z-index {index}");
        self.events.push(DrawingEvent::Added(id));
    }

    /// Remove a shape, returning its former z-index and value.
    pub fn remove(&mut self, id: ShapeId) -> Option<(usize, Shape)> {
        let shape = self.shapes.remove(&id)?;
        let index = self.index_of(id).unwrap_or(self.z_order.len());
        self.z_order.retain(|&shape_id| shape_id != id);
        log::trace!("Removed shape {id} from z-index {index}");
        self.events.push(DrawingEvent::Removed(id));
        Some((index, shape))
    }

    /// Mutate a stored shape in place. Returns false if it is not present.
    pub fn update(&mut self, id: ShapeId, f: impl FnOnce(&mut Shape)) -> bool {
        match self.shapes.get_mut(&id) {
            Some(shape) => {
                f(shape);
                log::trace!("Updated shape {id}");
                self.events.push(DrawingEvent::Updated(id));
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Position of a shape in z-order (0 = back).
    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.z_order.iter().position(|&shape_id| shape_id == id)
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn len(&self) -> usize {
        self.z_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z_order.is_empty()
    }

    /// Remove every shape.
    pub fn clear(&mut self) {
        for id in self.z_order.drain(..) {
            self.events.push(DrawingEvent::Removed(id));
        }
        self.shapes.clear();
    }

    /// Draw every shape back to front.
    ///
    /// Translucent pen strokes are drawn opaque into a layer that is then
    /// blended at the stroke's alpha, so overlapping segments of one stroke
    /// do not darken each other.
    pub fn render(&self, surface: &mut dyn LayerSurface) {
        for shape in self.shapes_ordered() {
            match translucent_stroke(shape) {
                Some((opaque, alpha)) => {
                    let mut layer = surface.create_layer(self.size);
                    opaque.render(&mut *layer);
                    surface.composite_layer(&*layer, alpha);
                }
                None => shape.render(surface),
            }
        }
    }

    /// Take the change notifications recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<DrawingEvent> {
        std::mem::take(&mut self.events)
    }
}

/// An opaque copy of a translucent pen stroke and the alpha it was drawn with.
fn translucent_stroke(shape: &Shape) -> Option<(Shape, f64)> {
    let pen = shape.as_pen()?;
    let color = pen.style.stroke_color?;
    if pen.is_eraser || color.a == u8::MAX {
        return None;
    }
    let mut opaque = shape.clone();
    opaque.style_mut().stroke_color = Some(color.opaque());
    Some((opaque, color.alpha()))
}
