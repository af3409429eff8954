//! Scanline-based triangle rasterization.
//!
//! Both fillers in this module visit every covered pixel exactly once by
//! computing a left and right bound per row and filling the span between
//! them. There is no per-pixel inside test.
//!
//! # Slope Walk
//!
//! The highest vertex `p` is the apex. Both edges leaving it are walked
//! downward one row at a time using their inverse slopes (`dx/dy`). When the
//! shorter edge ends at `ymid`, its slope is replaced by the slope of the
//! third edge and the walk continues down to `ymin`:
//!
//! ```text
//!          p
//!         /\
//!        /  \
//!       /    \ r   <- ymid: right edge ends, switch to r -> q
//!      /   _/
//!     / _/
//!    q/            <- ymin
//! ```
//!
//! # Sorted Scanline
//!
//! Vertices are sorted so that `p.y <= q.y <= r.y`. Edge `p -> r` spans the
//! whole height; the opposite bound follows `p -> q` up to `q.y` and then
//! `q -> r`. The row at `q.y` is emitted by both halves; both agree there
//! because they share vertex `q`.
//!
//! Both fillers round x positions half away from zero. Edge arithmetic is
//! widened to `i64`/`f64`, and only rows inside the canvas are walked, so the
//! cost of a fill is bounded by the visible part of the triangle.
//!
//! # References
//!
//! - Foley, van Dam et al., "Computer Graphics: Principles and Practice"
//! - Sokolov, "tinyrenderer", lesson 2

use super::{Rasterizer, Triangle};
use crate::colors::Color;
use crate::math::Point2;
use crate::render::canvas::Canvas;

/// `to - from`, widened first.
#[inline]
fn delta(from: i32, to: i32) -> i64 {
    to as i64 - from as i64
}

/// Inverse slope `dx / dy`. Callers guarantee `dy != 0`.
#[inline]
fn inv_slope(dx: i64, dy: i64) -> f64 {
    dx as f64 / dy as f64
}

/// `x` moved along an edge with inverse slope `slope` over `dy` rows,
/// saturated to the `i32` range.
#[inline]
fn step_x(x: i32, slope: f64, dy: i64) -> i32 {
    let offset = (slope * dy as f64).round() as i64;
    (x as i64)
        .saturating_add(offset)
        .clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Rows `low..=high` that exist on the canvas.
#[inline]
fn visible_rows(low: i32, high: i32, canvas: &Canvas) -> std::ops::RangeInclusive<i32> {
    low.max(0)..=high.min(canvas.height() as i32 - 1)
}

/// Triangle filler walking both edges down from the highest vertex.
pub struct SlopeWalkRasterizer;

impl SlopeWalkRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Orders the vertices so `p` has the greatest y, and of the remaining
    /// two `q` has the smaller x.
    fn sort_vertices(p: &mut Point2, q: &mut Point2, r: &mut Point2) {
        if p.y < q.y {
            std::mem::swap(p, q);
        }
        if p.y < r.y {
            std::mem::swap(p, r);
        }
        if q.x > r.x {
            std::mem::swap(q, r);
        }
    }

    /// Fills a triangle whose top edge `a - b` is horizontal, walking both
    /// top vertices down to `bottom`. The top row is the span `a.x..=b.x`.
    fn fill_flat_top(a: Point2, b: Point2, bottom: Point2, canvas: &mut Canvas, color: Color) {
        let top = a.y;
        let height = delta(bottom.y, top);
        let slope_a = inv_slope(delta(a.x, bottom.x), height);
        let slope_b = inv_slope(delta(b.x, bottom.x), height);

        for y in visible_rows(bottom.y, top, canvas).rev() {
            let dy = delta(y, top);
            canvas.fill_scanline(y, step_x(a.x, slope_a, dy), step_x(b.x, slope_b, dy), color);
        }
    }
}

impl Default for SlopeWalkRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for SlopeWalkRasterizer {
    /// Fills a triangle by walking its edges from the apex.
    ///
    /// # Horizontal edges
    ///
    /// - All three vertices on one row: degenerate, nothing is drawn.
    /// - Horizontal top edge: filled as a flat-top triangle, no apex walk.
    /// - Horizontal bottom edge: the first walk ends on the shared row and
    ///   there is no second segment.
    fn fill_triangle(&self, triangle: &Triangle, canvas: &mut Canvas) {
        let [mut p, mut q, mut r] = triangle.points;
        let color = triangle.color;
        Self::sort_vertices(&mut p, &mut q, &mut r);

        if p.y == q.y && p.y == r.y {
            log::trace!("Skipping zero-height triangle at y={}", p.y);
            return;
        }
        if p.y == q.y {
            Self::fill_flat_top(p, q, r, canvas, color);
            return;
        }
        if p.y == r.y {
            Self::fill_flat_top(p, r, q, canvas, color);
            return;
        }

        // p -> q is the left edge and p -> r the right edge.
        let mut m_left = inv_slope(delta(p.x, q.x), delta(q.y, p.y));
        let mut m_right = inv_slope(delta(p.x, r.x), delta(r.y, p.y));
        let y_mid = q.y.max(r.y);
        let y_min = q.y.min(r.y);

        for y in visible_rows(y_mid, p.y, canvas).rev() {
            let dy = delta(y, p.y);
            canvas.fill_scanline(y, step_x(p.x, m_left, dy), step_x(p.x, m_right, dy), color);
        }

        if y_mid == y_min {
            return;
        }

        // Both edges at y_mid, where the walk above ended.
        let x_left = step_x(p.x, m_left, delta(y_mid, p.y));
        let x_right = step_x(p.x, m_right, delta(y_mid, p.y));

        // The edge that ended at y_mid continues along the third edge.
        if q.y == y_mid {
            m_left = inv_slope(delta(q.x, r.x), delta(y_min, y_mid));
        } else {
            m_right = inv_slope(delta(r.x, q.x), delta(y_min, y_mid));
        }

        for y in visible_rows(y_min, y_mid - 1, canvas).rev() {
            let dy = delta(y, y_mid);
            canvas.fill_scanline(y, step_x(x_left, m_left, dy), step_x(x_right, m_right, dy), color);
        }
    }
}

/// Triangle filler over y-sorted vertices, split into two trapezoids at the
/// middle vertex.
pub struct SortedScanlineRasterizer;

impl SortedScanlineRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Sorts three vertices by y so that `p.y <= q.y <= r.y`.
    fn sort_vertices(p: &mut Point2, q: &mut Point2, r: &mut Point2) {
        if p.y > q.y {
            std::mem::swap(p, q);
        }
        if p.y > r.y {
            std::mem::swap(p, r);
        }
        if q.y > r.y {
            std::mem::swap(q, r);
        }
    }

    /// x on edge `a -> b` at row `y`. Callers guarantee `a.y != b.y`.
    #[inline]
    fn edge_x(a: Point2, b: Point2, y: i32) -> i32 {
        step_x(a.x, inv_slope(delta(a.x, b.x), delta(a.y, b.y)), delta(a.y, y))
    }
}

impl Default for SortedScanlineRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for SortedScanlineRasterizer {
    /// Fills a triangle top-to-bottom in two segments.
    ///
    /// A segment with zero height is skipped, so a triangle whose vertices all
    /// share one row draws nothing.
    fn fill_triangle(&self, triangle: &Triangle, canvas: &mut Canvas) {
        let [mut p, mut q, mut r] = triangle.points;
        let color = triangle.color;
        Self::sort_vertices(&mut p, &mut q, &mut r);

        if p.y == r.y {
            log::trace!("Skipping zero-height triangle at y={}", p.y);
            return;
        }

        if p.y != q.y {
            for y in visible_rows(p.y, q.y, canvas) {
                let x1 = Self::edge_x(p, q, y);
                let x2 = Self::edge_x(p, r, y);
                canvas.fill_scanline(y, x1, x2, color);
            }
        }

        if q.y != r.y {
            for y in visible_rows(q.y, r.y, canvas) {
                let x1 = Self::edge_x(q, r, y);
                let x2 = Self::edge_x(p, r, y);
                canvas.fill_scanline(y, x1, x2, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLUE, ORANGE, TRANSPARENT};

    fn filled(canvas: &Canvas) -> usize {
        canvas.pixels().iter().filter(|&&c| c != TRANSPARENT).count()
    }

    fn row_span(canvas: &Canvas, y: i32) -> Option<(i32, i32)> {
        let xs: Vec<i32> = (0..canvas.width() as i32)
            .filter(|&x| canvas.get_pixel(x, y) != Some(TRANSPARENT))
            .collect();
        Some((*xs.first()?, *xs.last()?))
    }

    fn right_triangle() -> Triangle {
        Triangle::new(Point2::new(0, 0), Point2::new(8, 0), Point2::new(0, 8), BLUE)
    }

    #[test]
    fn slope_walk_right_triangle() {
        let mut canvas = Canvas::new(16, 16).unwrap();
        SlopeWalkRasterizer.fill_triangle(&right_triangle(), &mut canvas);
        assert_eq!(filled(&canvas), 45);
        for y in 0..=8 {
            assert_eq!(row_span(&canvas, y), Some((0, 8 - y)));
        }
    }

    #[test]
    fn sorted_right_triangle() {
        let mut canvas = Canvas::new(16, 16).unwrap();
        SortedScanlineRasterizer.fill_triangle(&right_triangle(), &mut canvas);
        assert_eq!(filled(&canvas), 45);
        for y in 0..=8 {
            assert_eq!(row_span(&canvas, y), Some((0, 8 - y)));
        }
    }

    #[test]
    fn slope_walk_horizontal_top_edge() {
        let mut canvas = Canvas::new(16, 16).unwrap();
        let tri = Triangle::new(Point2::new(0, 8), Point2::new(8, 8), Point2::new(4, 0), ORANGE);
        SlopeWalkRasterizer.fill_triangle(&tri, &mut canvas);
        assert_eq!(row_span(&canvas, 8), Some((0, 8)));
        assert_eq!(row_span(&canvas, 0), Some((4, 4)));
        assert_eq!(row_span(&canvas, 4), Some((2, 6)));
        assert_eq!(row_span(&canvas, 9), None);
    }

    #[test]
    fn slope_walk_horizontal_top_edge_on_the_right() {
        // After sorting the flat partner of the apex ends up as `r`.
        let mut canvas = Canvas::new(16, 16).unwrap();
        let tri = Triangle::new(Point2::new(2, 10), Point2::new(12, 10), Point2::new(0, 2), ORANGE);
        SlopeWalkRasterizer.fill_triangle(&tri, &mut canvas);
        assert_eq!(row_span(&canvas, 10), Some((2, 12)));
        assert_eq!(row_span(&canvas, 2), Some((0, 0)));
    }

    #[test]
    fn slope_walk_continues_past_middle_vertex() {
        let mut canvas = Canvas::new(16, 16).unwrap();
        // Apex (6, 12), right edge ends at (12, 6), left edge runs to (2, 0).
        let tri = Triangle::new(Point2::new(2, 0), Point2::new(12, 6), Point2::new(6, 12), ORANGE);
        SlopeWalkRasterizer.fill_triangle(&tri, &mut canvas);
        assert_eq!(row_span(&canvas, 12), Some((6, 6)));
        assert_eq!(row_span(&canvas, 6), Some((4, 12)));
        assert_eq!(row_span(&canvas, 0), Some((2, 2)));
        assert_eq!(row_span(&canvas, 13), None);
    }

    #[test]
    fn sorted_shares_the_middle_row() {
        let mut canvas = Canvas::new(16, 16).unwrap();
        let tri = Triangle::new(Point2::new(6, 12), Point2::new(2, 0), Point2::new(12, 6), ORANGE);
        SortedScanlineRasterizer.fill_triangle(&tri, &mut canvas);
        assert_eq!(row_span(&canvas, 6), Some((4, 12)));
        assert_eq!(row_span(&canvas, 0), Some((2, 2)));
        assert_eq!(row_span(&canvas, 12), Some((6, 6)));
    }

    #[test]
    fn zero_height_triangles_draw_nothing() {
        let tri = Triangle::new(Point2::new(1, 5), Point2::new(9, 5), Point2::new(4, 5), BLUE);
        let mut canvas = Canvas::new(16, 16).unwrap();
        SlopeWalkRasterizer.fill_triangle(&tri, &mut canvas);
        SortedScanlineRasterizer.fill_triangle(&tri, &mut canvas);
        assert_eq!(filled(&canvas), 0);
    }

    #[test]
    fn both_windings_are_filled() {
        let [p, q, r] = right_triangle().points;
        let reversed = Triangle::new(p, r, q, BLUE);
        for rasterizer in [&SlopeWalkRasterizer as &dyn Rasterizer, &SortedScanlineRasterizer] {
            let mut canvas = Canvas::new(16, 16).unwrap();
            rasterizer.fill_triangle(&reversed, &mut canvas);
            assert_eq!(filled(&canvas), 45);
        }
    }

    #[test]
    fn only_visible_rows_are_walked() {
        // Four billion rows tall; the fill only touches the canvas rows.
        const FAR: i32 = 2_000_000_000;
        let tri = Triangle::new(Point2::new(0, FAR), Point2::new(0, -FAR), Point2::new(10, 0), ORANGE);
        for rasterizer in [&SlopeWalkRasterizer as &dyn Rasterizer, &SortedScanlineRasterizer] {
            let mut canvas = Canvas::new(16, 16).unwrap();
            rasterizer.fill_triangle(&tri, &mut canvas);
            for y in 0..16 {
                assert_eq!(row_span(&canvas, y), Some((0, 10)));
            }
        }
    }
}
