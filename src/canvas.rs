//! Fixed-size RGBA drawing surface on top of vello_cpu
//!
//! Shapes are recorded into a render context and only rasterized by
//! [`Canvas::finish`], which also blurs the glow layer and adds it over the
//! finished frame.

use crate::colors::Rgb;
use crate::error::Result;
use image::{imageops, ImageFormat, RgbaImage};
use std::path::Path;
use vello_cpu::kurbo::{Cap, Circle, Line, Point, Rect, Shape, Stroke};
use vello_cpu::peniko::{Color, Gradient};
use vello_cpu::{Pixmap, RenderContext};

/// Flattening tolerance for curves, in pixels
const TOLERANCE: f64 = 0.1;

/// Thinnest stroke that still leaves a visible trace
const MIN_STROKE: f64 = 1.0;

/// Extra width shapes get on the glow layer
const GLOW_SPREAD: f64 = 4.0;
const GLOW_SIGMA: f32 = 5.0;
const GLOW_GAIN: f32 = 0.9;

/// A raster the renderer paints into, one frame at a time
pub struct Canvas {
    width: u16,
    height: u16,
    scene: RenderContext,
    glow_layer: Option<RenderContext>,
    glowing: bool,
    pixmap: Pixmap,
    pixels: RgbaImage,
}

impl Canvas {
    /// A zero-sized surface is treated as "nothing to draw on"
    pub fn new(width: u32, height: u32) -> Option<Self> {
        let w = u16::try_from(width).ok().filter(|w| *w > 0)?;
        let h = u16::try_from(height).ok().filter(|h| *h > 0)?;
        Some(Self {
            width: w,
            height: h,
            scene: RenderContext::new(w, h),
            glow_layer: None,
            glowing: false,
            pixmap: Pixmap::new(w, h),
            pixels: RgbaImage::new(width, height),
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// The frame as of the last [`Canvas::finish`]
    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let p = self.pixels.get_pixel(x, y).0;
        Rgb { r: p[0], g: p[1], b: p[2] }
    }

    /// Mirror the following strokes and discs onto the blurred glow layer
    pub fn set_glow(&mut self, glow: bool) {
        self.glowing = glow;
    }

    /// Cover the surface with a top-to-bottom two-stop gradient
    pub fn fill_vertical_gradient(&mut self, top: Rgb, bottom: Rgb) {
        let (w, h) = (self.width() as f64, self.height() as f64);
        let gradient = Gradient::new_linear(Point::new(0.0, 0.0), Point::new(0.0, h))
            .with_stops([paint(top, 1.0), paint(bottom, 1.0)]);
        self.scene.set_paint(gradient);
        self.scene.fill_rect(&Rect::new(0.0, 0.0, w, h));
    }

    /// Anti-aliased filled disc
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb, alpha: f64) {
        if !(cx.is_finite() && cy.is_finite() && radius > 0.0) {
            return;
        }
        let disc = Circle::new((cx, cy), radius).to_path(TOLERANCE);
        self.scene.set_paint(paint(color, alpha));
        self.scene.fill_path(&disc);

        if self.glowing {
            let halo = Circle::new((cx, cy), radius + GLOW_SPREAD / 2.0).to_path(TOLERANCE);
            let layer = self.glow_layer();
            layer.set_paint(paint(color, alpha));
            layer.fill_path(&halo);
        }
    }

    /// Anti-aliased line of `width` pixels with round caps
    pub fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Rgb, alpha: f64) {
        if ![x1, y1, x2, y2, width].iter().all(|v| v.is_finite()) {
            return;
        }
        let line = Line::new((x1, y1), (x2, y2)).to_path(TOLERANCE);
        let width = width.max(MIN_STROKE);
        self.scene.set_stroke(round_stroke(width));
        self.scene.set_paint(paint(color, alpha));
        self.scene.stroke_path(&line);

        if self.glowing {
            let layer = self.glow_layer();
            layer.set_stroke(round_stroke(width + GLOW_SPREAD));
            layer.set_paint(paint(color, alpha));
            layer.stroke_path(&line);
        }
    }

    /// Run `draw` inside a layer composited at `alpha`
    pub fn with_opacity(&mut self, alpha: f64, draw: impl FnOnce(&mut Self)) {
        self.scene.push_opacity_layer(alpha.clamp(0.0, 1.0) as f32);
        draw(self);
        self.scene.pop_layer();
    }

    /// Rasterize everything drawn since the last call into [`Canvas::image`]
    pub fn finish(&mut self) {
        let (w, h) = (self.width, self.height);
        let scene = std::mem::replace(&mut self.scene, RenderContext::new(w, h));
        rasterize(scene, &mut self.pixmap);
        for (dst, src) in self.pixels.pixels_mut().zip(self.pixmap.data_as_u8_slice().chunks_exact(4)) {
            dst.0 = unpremultiply(src);
        }

        let Some(layer) = self.glow_layer.take() else {
            return;
        };
        let mut halo = Pixmap::new(w, h);
        rasterize(layer, &mut halo);
        let Some(halo) = RgbaImage::from_raw(self.width(), self.height(), halo.data_as_u8_slice().to_vec()) else {
            return;
        };
        // Premultiplied halo colors are added straight onto the frame
        let halo = imageops::fast_blur(&halo, GLOW_SIGMA);
        for (dst, src) in self.pixels.pixels_mut().zip(halo.pixels()) {
            for c in 0..3 {
                dst.0[c] = dst.0[c].saturating_add((src.0[c] as f32 * GLOW_GAIN) as u8);
            }
        }
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.pixels.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    fn glow_layer(&mut self) -> &mut RenderContext {
        let (w, h) = (self.width, self.height);
        self.glow_layer.get_or_insert_with(|| RenderContext::new(w, h))
    }
}

fn paint(color: Rgb, alpha: f64) -> Color {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::from_rgba8(color.r, color.g, color.b, a)
}

fn round_stroke(width: f64) -> Stroke {
    Stroke::new(width).with_caps(Cap::Round)
}

fn rasterize(mut ctx: RenderContext, pixmap: &mut Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
    ctx.flush();
    ctx.render_to_pixmap(pixmap);
}

fn unpremultiply(px: &[u8]) -> [u8; 4] {
    let a = px[3];
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| ((c as u16 * 255 + a as u16 / 2) / a as u16).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), a]
}
