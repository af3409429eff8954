//! Barycentric triangle rasterization.
//!
//! Every pixel in the triangle's bounding box is tested independently: the
//! pixel splits the triangle into three sub-triangles, and it lies inside iff
//! all three signed sub-areas are non-negative. Normalized by the full area
//! these are the barycentric coordinates:
//!
//! ```text
//! alpha = area(P, q, r) / area(p, q, r)
//! beta  = area(P, r, p) / area(p, q, r)
//! gamma = area(P, p, q) / area(p, q, r)
//! ```
//!
//! Because no pixel depends on another, rows of the bounding box are handed
//! to rayon workers. Each worker owns one canvas row.

use rayon::prelude::*;

use super::{coverage, BoundingBox, Rasterizer, Triangle, SAMPLE_OFFSETS};
use crate::colors::Color;
use crate::math::Vec2;
use crate::render::canvas::Canvas;

/// Triangles with a smaller signed area are not drawn by the exact filler.
const MIN_AREA: f32 = 1.0;

/// Signed area of triangle `(p, q, r)`.
///
/// ```text
/// 0.5 * (p.x * (q.y - r.y) + q.x * (r.y - p.y) + r.x * (p.y - q.y))
/// ```
///
/// Positive for counter-clockwise winding in the y-up canvas space.
#[inline]
pub fn signed_area(p: Vec2, q: Vec2, r: Vec2) -> f32 {
    0.5 * (p.x * (q.y - r.y) + q.x * (r.y - p.y) + r.x * (p.y - q.y))
}

/// Precomputed vertices for the per-pixel inside test.
#[derive(Clone, Copy)]
struct Barycentric {
    p: Vec2,
    q: Vec2,
    r: Vec2,
}

impl Barycentric {
    fn new(triangle: &Triangle) -> Self {
        let [p, q, r] = triangle.points;
        Self {
            p: p.into(),
            q: q.into(),
            r: r.into(),
        }
    }

    fn area(&self) -> f32 {
        signed_area(self.p, self.q, self.r)
    }

    /// Whether `s` lies inside or on the boundary of the triangle.
    ///
    /// Only the signs of the sub-areas matter for a positive total area, so
    /// the division by the full area is skipped.
    #[inline]
    fn contains(&self, s: Vec2) -> bool {
        signed_area(s, self.q, self.r) >= 0.0
            && signed_area(s, self.r, self.p) >= 0.0
            && signed_area(s, self.p, self.q) >= 0.0
    }
}

/// Bounding-box filler writing solid color wherever the barycentric
/// coordinates of the pixel are all non-negative.
///
/// Triangles with signed area below 1 are treated as degenerate or
/// back-facing and skipped.
pub struct BarycentricRasterizer;

impl BarycentricRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BarycentricRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for BarycentricRasterizer {
    fn fill_triangle(&self, triangle: &Triangle, canvas: &mut Canvas) {
        let tri = Barycentric::new(triangle);
        let area = tri.area();
        if area < MIN_AREA {
            log::trace!("Culling triangle with signed area {}", area);
            return;
        }
        let Some(bb) = BoundingBox::clipped(&triangle.points, canvas) else {
            return;
        };
        let color = triangle.color;

        canvas.par_rows_mut(bb.min_y, bb.max_y).for_each(|(y, row)| {
            for x in bb.min_x..=bb.max_x {
                if tri.contains(Vec2::new(x as f32, y as f32)) {
                    row[x as usize] = color;
                }
            }
        });
    }
}

/// Barycentric filler with 4 samples per pixel.
///
/// The fraction of samples inside the triangle is the pixel's coverage, and
/// the triangle color is composited over the existing pixel with
/// [`Color::with_coverage`]. Pixels with no samples inside are untouched.
pub struct SupersampledBarycentricRasterizer;

impl SupersampledBarycentricRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SupersampledBarycentricRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for SupersampledBarycentricRasterizer {
    fn fill_triangle(&self, triangle: &Triangle, canvas: &mut Canvas) {
        let tri = Barycentric::new(triangle);
        let area = tri.area();
        if area <= 0.0 {
            log::trace!("Culling triangle with signed area {}", area);
            return;
        }
        let Some(bb) = BoundingBox::clipped(&triangle.points, canvas) else {
            return;
        };
        let color = triangle.color;

        canvas.par_rows_mut(bb.min_y, bb.max_y).for_each(|(y, row)| {
            for x in bb.min_x..=bb.max_x {
                let center = Vec2::new(x as f32, y as f32);
                let inside = SAMPLE_OFFSETS
                    .iter()
                    .filter(|&&offset| tri.contains(center + offset))
                    .count();
                if inside == 0 {
                    continue;
                }
                let pixel = &mut row[x as usize];
                if let Some(blended) = Color::with_coverage(*pixel, color, coverage(inside)) {
                    *pixel = blended;
                }
            }
        });
    }
}
