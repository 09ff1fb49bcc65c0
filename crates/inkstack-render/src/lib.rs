//! inkstack render library
//!
//! A software raster implementation of the core rendering capability,
//! with offscreen layers for composite-at-alpha pen strokes and PNG export.

mod raster;
mod scanline;

pub use raster::{RasterSurface, RenderResult, RendererError};
