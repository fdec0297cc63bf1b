//! One complete frame: background, dot field, branches and leaves

use crate::canvas::Canvas;
use crate::colors::{self, Rgb};
use crate::config::TreeConfig;
use crate::geometry::Segment;
use crate::sway;
use rand::Rng;

/// Stars (or snowflakes) scattered per frame
pub const DOT_COUNT: usize = 90;

/// Leaves hang off the two outermost levels
const LEAF_DEPTH: u32 = 2;
const LEAF_ALPHA: f64 = 0.8;
const LEAF_RADIUS_MIN: f64 = 1.2;
const LEAF_RADIUS_MAX: f64 = 5.0;

/// Everything the renderer reads for one frame
pub struct Frame<'a> {
    pub segments: &'a [Segment],
    pub config: &'a TreeConfig,
    pub wind_time: f64,
    pub reveal: usize,
}

impl Frame<'_> {
    /// Number of segments drawn this frame
    pub fn visible(&self) -> usize {
        if self.config.grow {
            self.reveal.min(self.segments.len())
        } else {
            self.segments.len()
        }
    }
}

/// Paint `frame` over the whole canvas. Glow, when on, covers branches and leaves alike.
pub fn render_frame<R: Rng>(canvas: &mut Canvas, frame: &Frame, dot_rng: &mut R) {
    let config = frame.config;

    let (top, bottom) = config.theme.gradient();
    canvas.fill_vertical_gradient(top, bottom);
    scatter_dots(canvas, config.theme.dot_opacity(), dot_rng);

    canvas.set_glow(config.preset.glow());
    let leaf_color = config.preset.palette().leaf;

    for segment in &frame.segments[..frame.visible()] {
        let angle = sway::sway_angle(
            config.wind,
            config.wind_strength,
            frame.wind_time,
            segment.depth_left,
            segment.total_depth,
        );
        let (x2, y2) = sway::swayed_end(segment, angle);
        let color = colors::resolve(config.preset, segment.depth_left, segment.total_depth, config.leaf_mode);

        canvas.stroke_line(segment.x1, segment.y1, x2, y2, segment.thickness, color, 1.0);

        if config.leaf_mode && segment.depth_left <= LEAF_DEPTH {
            let radius = (segment.thickness * 1.6).clamp(LEAF_RADIUS_MIN, LEAF_RADIUS_MAX);
            canvas.fill_circle(x2, y2, radius, leaf_color, LEAF_ALPHA);
        }
    }

    canvas.set_glow(false);
    canvas.finish();
}

/// Cutoff after a frame was drawn: moves forward by `grow_speed`, never past `len`
pub fn advance_reveal(reveal: usize, len: usize, grow: bool, grow_speed: u32) -> usize {
    if !grow || reveal >= len {
        return reveal;
    }
    reveal.saturating_add(grow_speed as usize).min(len)
}

fn scatter_dots<R: Rng>(canvas: &mut Canvas, opacity: f64, rng: &mut R) {
    let (w, h) = (canvas.width() as f64, canvas.height() as f64);
    canvas.with_opacity(opacity, |canvas| {
        for _ in 0..DOT_COUNT {
            let x = rng.gen_range(0.0..w);
            let y = rng.gen_range(0.0..h);
            let r = rng.gen_range(0.6..1.8);
            canvas.fill_circle(x, y, r, Rgb::WHITE, 1.0);
        }
    });
}
