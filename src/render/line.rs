//! Integer Bresenham line rasterization.
//!
//! Bresenham's algorithm decides which pixels to light using only integer
//! arithmetic. The walk always proceeds one pixel at a time along the axis of
//! greater extent (the major axis), while an accumulated error term decides
//! when the minor axis should also step.
//!
//! Lines steeper than 45° are handled by swapping the roles of x and y
//! ("transposing") before the walk and swapping them back when each pixel is
//! emitted. Lines running right-to-left are walked from the other end.

use super::canvas::Canvas;
use super::rasterizer::Triangle;
use crate::colors::Color;
use crate::math::Point2;

/// Iterator over the pixels of a Bresenham line, endpoints included.
///
/// Yields exactly `max(|dx|, |dy|) + 1` points. The order runs from the
/// lower major-axis coordinate to the higher one, which may be the reverse of
/// the argument order. The walk state is `i64` so any pair of `i32` endpoints
/// is accepted.
#[derive(Clone, Debug)]
pub struct BresenhamLine {
    transpose: bool,
    x: i64,
    x_end: i64,
    y: i64,
    y_step: i64,
    /// Major-axis run, `x_end - x` at the start of the walk.
    run: i64,
    /// Twice the minor-axis rise, added to the error every step.
    rise2: i64,
    /// Always in `(-run, run]`.
    ierror: i64,
}

impl BresenhamLine {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (mut ax, mut ay, mut bx, mut by) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);

        let transpose = (by - ay).abs() > (bx - ax).abs();
        if transpose {
            std::mem::swap(&mut ax, &mut ay);
            std::mem::swap(&mut bx, &mut by);
        }
        if ax > bx {
            std::mem::swap(&mut ax, &mut bx);
            std::mem::swap(&mut ay, &mut by);
        }

        Self {
            transpose,
            x: ax,
            x_end: bx,
            y: ay,
            y_step: if by > ay { 1 } else { -1 },
            run: bx - ax,
            rise2: 2 * (by - ay).abs(),
            ierror: 0,
        }
    }

    /// Restricts the walk to points that can land on a `width` x `height`
    /// canvas along the major axis.
    ///
    /// Leading points are skipped in constant time: after `k` steps the
    /// minor axis has moved `n` times, where `n` is the one integer that puts
    /// `k * rise2 - 2 * run * n` back in `(-run, run]`.
    pub fn clipped(mut self, width: u32, height: u32) -> Self {
        let limit = (if self.transpose { height } else { width }) as i64 - 1;
        self.x_end = self.x_end.min(limit);

        if self.x < 0 {
            let steps = -(self.x as i128);
            if self.run > 0 {
                let run2 = 2 * self.run as i128;
                let total = steps * self.rise2 as i128;
                let excess = total - self.run as i128;
                let n = excess.div_euclid(run2) + (excess.rem_euclid(run2) != 0) as i128;
                self.y += self.y_step * n as i64;
                self.ierror = (total - run2 * n) as i64;
            }
            self.x = 0;
        }
        self
    }
}

impl Iterator for BresenhamLine {
    type Item = Point2;

    fn next(&mut self) -> Option<Point2> {
        if self.x > self.x_end {
            return None;
        }

        // Both coordinates lie between the original endpoints.
        let (x, y) = (self.x as i32, self.y as i32);
        let point = if self.transpose {
            Point2::new(y, x)
        } else {
            Point2::new(x, y)
        };

        self.ierror += self.rise2;
        if self.ierror > self.run {
            self.y += self.y_step;
            self.ierror -= 2 * self.run;
        }
        self.x += 1;

        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.x_end - self.x + 1).max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BresenhamLine {}

impl Canvas {
    /// Draws a line between two points using Bresenham's algorithm.
    ///
    /// Pixels that fall off the canvas are dropped. Only the part of the
    /// major axis that overlaps the canvas is walked.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let line = BresenhamLine::new(x0, y0, x1, y1).clipped(self.width(), self.height());
        for p in line {
            self.set_pixel(p.x, p.y, color);
        }
    }

    /// Draws a line after clamping both endpoints into the canvas.
    ///
    /// This is clamping, not clipping: an endpoint outside the canvas is moved
    /// to the nearest edge, which changes the slope of the drawn line.
    pub fn draw_line_clamped(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let max_x = self.width() as i32 - 1;
        let max_y = self.height() as i32 - 1;
        self.draw_line(
            x0.clamp(0, max_x),
            y0.clamp(0, max_y),
            x1.clamp(0, max_x),
            y1.clamp(0, max_y),
            color,
        );
    }

    /// Outlines a triangle by drawing its three edges.
    pub fn draw_triangle_wireframe(&mut self, triangle: &Triangle) {
        let [p, q, r] = triangle.points;
        for (a, b) in [(p, q), (q, r), (r, p)] {
            self.draw_line(a.x, a.y, b.x, b.y, triangle.color);
        }
    }
}
