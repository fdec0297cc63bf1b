//! Show the raster in a terminal with half-block cells

use crate::canvas::Canvas;
use crate::terminal::Terminal;
use crossterm::style::Color;
use image::imageops::{self, FilterType};

/// Where the picture lands in the terminal, in cell units
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: u16,
    pub y: u16,
    pub cols: u16,
    /// Each row holds two pixel rows
    pub rows: u16,
}

/// Fit a `src_w` x `src_h` image into `cols` x `rows` cells, keeping its aspect.
///
/// A half-block cell is one pixel wide and two tall, and terminal cells are
/// about twice as tall as wide, so pixels come out square.
pub fn fit(src_w: u32, src_h: u32, cols: u16, rows: u16) -> Placement {
    if src_w == 0 || src_h == 0 || cols == 0 || rows == 0 {
        return Placement { x: 0, y: 0, cols: 0, rows: 0 };
    }

    let max_px_h = rows as f64 * 2.0;
    let scale = (cols as f64 / src_w as f64).min(max_px_h / src_h as f64);
    // Nudge before flooring so an exact fit is not lost to rounding
    let px_w = ((src_w as f64 * scale + 1e-6).floor() as u16).clamp(1, cols);
    let px_h = ((src_h as f64 * scale + 1e-6).floor() as u16).max(2);
    let art_rows = (px_h / 2).clamp(1, rows);

    Placement {
        x: (cols - px_w) / 2,
        y: (rows - art_rows) / 2,
        cols: px_w,
        rows: art_rows,
    }
}

/// Downsample the canvas and draw it at `at`
pub fn draw_canvas(term: &mut Terminal, canvas: &Canvas, at: Placement) {
    if at.cols == 0 || at.rows == 0 {
        return;
    }

    let small = imageops::resize(canvas.image(), at.cols as u32, at.rows as u32 * 2, FilterType::Triangle);

    for cy in 0..at.rows as u32 {
        for cx in 0..at.cols as u32 {
            let top = small.get_pixel(cx, cy * 2).0;
            let bot = small.get_pixel(cx, cy * 2 + 1).0;
            term.set_with_bg(
                at.x as i32 + cx as i32,
                at.y as i32 + cy as i32,
                '▀',
                Some(Color::Rgb { r: top[0], g: top[1], b: top[2] }),
                Some(Color::Rgb { r: bot[0], g: bot[1], b: bot[2] }),
                false,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_terminal_is_limited_by_height() {
        let p = fit(1000, 650, 200, 40);
        assert_eq!(p.rows, 40);
        assert_eq!(p.cols, 123);
        assert_eq!(p.x, (200 - 123) / 2);
        assert_eq!(p.y, 0);
    }

    #[test]
    fn narrow_terminal_is_limited_by_width() {
        let p = fit(1000, 650, 80, 60);
        assert_eq!(p.cols, 80);
        assert_eq!(p.rows, 26);
        assert_eq!(p.y, (60 - 26) / 2);
    }

    #[test]
    fn empty_area_places_nothing() {
        assert_eq!(fit(1000, 650, 0, 10).cols, 0);
        assert_eq!(fit(0, 650, 80, 10).rows, 0);
    }
}
