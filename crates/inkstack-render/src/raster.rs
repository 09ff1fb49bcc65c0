//! CPU raster surface.

use crate::scanline::{TOLERANCE, fill_coverage};
use inkstack_core::render::{CompositeMode, Layer, LayerSurface, StrokeParams, Surface, TextRun};
use inkstack_core::shapes::{ADVANCE_EM, LINE_HEIGHT_EM};
use kurbo::{BezPath, Cap, Join, Rect, Shape as KurboShape, Size, Stroke, StrokeOpts};
use peniko::Color;
use std::any::Any;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Surface has no pixels")]
    EmptySurface,
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Premultiplied RGBA in `0.0..=1.0`.
type Pixel = [f32; 4];

fn premultiply(color: Color) -> Pixel {
    let rgba = color.to_rgba8();
    let a = rgba.a as f32 / 255.0;
    [
        rgba.r as f32 / 255.0 * a,
        rgba.g as f32 / 255.0 * a,
        rgba.b as f32 / 255.0 * a,
        a,
    ]
}

fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn unpremultiply(pixel: Pixel) -> [u8; 4] {
    let a = pixel[3];
    if a <= 0.0 {
        return [0, 0, 0, 0];
    }
    [to_u8(pixel[0] / a), to_u8(pixel[1] / a), to_u8(pixel[2] / a), to_u8(a)]
}

/// `src` over `dst`, both premultiplied.
fn source_over(dst: &mut Pixel, src: Pixel) {
    let inverse = 1.0 - src[3];
    for (d, s) in dst.iter_mut().zip(src) {
        *d = s + *d * inverse;
    }
}

/// A premultiplied RGBA pixel buffer implementing the core's rendering
/// capability. Layers are raster surfaces of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl RasterSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    /// Create a transparent surface covering `size`, rounded up to whole pixels.
    pub fn from_size(size: Size) -> Self {
        Self::new(size.width.max(0.0).ceil() as u32, size.height.max(0.0).ceil() as u32)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Replace every pixel with `color`.
    pub fn fill_background(&mut self, color: Color) {
        self.pixels.fill(premultiply(color));
    }

    /// Straight-alpha RGBA8 value of a pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(unpremultiply(self.pixels[(y * self.width + x) as usize]))
    }

    /// Straight-alpha RGBA8 bytes, row by row.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&p| unpremultiply(p)).collect()
    }

    /// Encode the surface as a PNG image.
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        if self.width == 0 || self.height == 0 {
            return Err(RendererError::EmptySurface);
        }
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| RendererError::Encode(e.to_string()))?;
            writer
                .write_image_data(&self.to_rgba8())
                .map_err(|e| RendererError::Encode(e.to_string()))?;
            writer.finish().map_err(|e| RendererError::Encode(e.to_string()))?;
        }
        log::debug!("Encoded {}x{} PNG ({} bytes)", self.width, self.height, png_data.len());
        Ok(png_data)
    }

    /// Fill `path` with `color` using the given composition.
    fn paint(&mut self, path: &BezPath, color: Color, mode: CompositeMode) {
        let source = premultiply(color);
        let width = self.width as usize;
        let pixels = &mut self.pixels;
        fill_coverage(path, self.width, self.height, |x, y, coverage| {
            let dst = &mut pixels[y * width + x];
            match mode {
                CompositeMode::SourceOver => source_over(dst, source.map(|c| c * coverage)),
                CompositeMode::DestinationOut => {
                    let keep = 1.0 - source[3] * coverage;
                    for channel in dst.iter_mut() {
                        *channel *= keep;
                    }
                }
            }
        });
    }
}

/// Outline of a stroked path with round caps and joins.
fn stroke_outline(path: &BezPath, stroke: &StrokeParams) -> BezPath {
    let style = Stroke::new(stroke.width)
        .with_caps(Cap::Round)
        .with_join(Join::Round)
        .with_dashes(0.0, &stroke.dashes);
    kurbo::stroke(path.iter(), &style, &StrokeOpts::default(), TOLERANCE)
}

/// Block outlines standing in for glyphs: one box per visible character,
/// laid out on the same monospace grid used to measure text.
fn glyph_boxes(text: &TextRun<'_>) -> BezPath {
    let advance = text.font_size * ADVANCE_EM;
    let line_height = text.font_size * LINE_HEIGHT_EM;
    let mut path = BezPath::new();
    for (row, line) in text.content.lines().enumerate() {
        let top = text.bounds.y0 + row as f64 * line_height;
        for (column, ch) in line.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let left = text.bounds.x0 + column as f64 * advance;
            let glyph = Rect::new(
                left + advance * 0.15,
                top + line_height * 0.2,
                left + advance * 0.85,
                top + line_height * 0.85,
            );
            path.extend(glyph.to_path(TOLERANCE));
        }
    }
    path.apply_affine(text.transform);
    path
}

impl Surface for RasterSurface {
    fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeParams) {
        if stroke.width <= 0.0 {
            return;
        }
        let outline = stroke_outline(path, stroke);
        self.paint(&outline, stroke.color, stroke.mode);
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.paint(path, color, CompositeMode::SourceOver);
    }

    fn draw_text(&mut self, text: &TextRun<'_>) {
        let glyphs = glyph_boxes(text);
        self.paint(&glyphs, text.color, CompositeMode::SourceOver);
    }
}

impl Layer for RasterSurface {
    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl LayerSurface for RasterSurface {
    fn create_layer(&self, size: Size) -> Box<dyn Layer> {
        Box::new(RasterSurface::from_size(size))
    }

    fn composite_layer(&mut self, layer: &dyn Layer, alpha: f64) {
        let Some(layer) = layer.as_any().downcast_ref::<RasterSurface>() else {
            log::warn!("Cannot composite a layer from another backend");
            return;
        };
        let alpha = alpha.clamp(0.0, 1.0) as f32;
        let width = self.width.min(layer.width) as usize;
        let height = self.height.min(layer.height) as usize;
        for y in 0..height {
            for x in 0..width {
                let src = layer.pixels[y * layer.width as usize + x];
                if src[3] <= 0.0 {
                    continue;
                }
                source_over(&mut self.pixels[y * self.width as usize + x], src.map(|c| c * alpha));
            }
        }
    }
}
