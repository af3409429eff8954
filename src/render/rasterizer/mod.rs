//! Triangle rasterization algorithms.
//!
//! This module provides six triangle fillers that all share one capability:
//! fill a triangle given three points and a color into a [`Canvas`]. They
//! are selected through the [`FillMode`] enum so callers and tests can
//! iterate every strategy against the same geometry.
//!
//! Available algorithms:
//! - [`SlopeWalkRasterizer`]: walks both edges down from the highest vertex
//! - [`SortedScanlineRasterizer`]: top/bottom trapezoids over y-sorted vertices
//! - [`BarycentricRasterizer`]: bounding box scan with signed sub-area tests
//! - [`SupersampledBarycentricRasterizer`]: 4-sample coverage, alpha blended
//! - [`EdgeFunctionRasterizer`]: incremental edge functions with the top-left rule
//! - [`SupersampledEdgeFunctionRasterizer`]: 4-sample edge functions, alpha blended
//!
//! [`EdgeFunctionRasterizer::fill_triangle_depth`] adds a z-buffered variant
//! for [`Triangle3`].
//!
//! # Winding
//!
//! The bounding-box fillers accept counter-clockwise triangles in the y-up
//! logical space and skip clockwise or degenerate ones. The scanline fillers
//! draw either winding.

mod barycentric;
mod edgefunction;
mod scanline;

use std::fmt;
use std::str::FromStr;

pub use barycentric::{signed_area, BarycentricRasterizer, SupersampledBarycentricRasterizer};
pub use edgefunction::{EdgeFunctionRasterizer, SupersampledEdgeFunctionRasterizer};
pub use scanline::{SlopeWalkRasterizer, SortedScanlineRasterizer};

use super::canvas::Canvas;
use crate::colors::Color;
use crate::error::RasterError;
use crate::math::{Point2, Point3, Vec2};

/// A flat-colored triangle in canvas-logical space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    pub points: [Point2; 3],
    pub color: Color,
}

impl Triangle {
    pub fn new(p: Point2, q: Point2, r: Point2, color: Color) -> Self {
        Self {
            points: [p, q, r],
            color,
        }
    }
}

/// A flat-colored triangle whose vertices carry depth for z-buffering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle3 {
    pub points: [Point3; 3],
    pub color: Color,
}

impl Triangle3 {
    pub fn new(p: Point3, q: Point3, r: Point3, color: Color) -> Self {
        Self {
            points: [p, q, r],
            color,
        }
    }

    /// The same triangle without depth.
    pub fn flatten(&self) -> Triangle {
        let [p, q, r] = self.points;
        Triangle::new(p.xy(), q.xy(), r.xy(), self.color)
    }
}

/// Trait for triangle rasterization algorithms.
///
/// Implementors are stateless: everything they need comes from the triangle
/// and the canvas they draw into.
pub trait Rasterizer {
    /// Fill a triangle into the canvas.
    fn fill_triangle(&self, triangle: &Triangle, canvas: &mut Canvas);
}

/// Sub-pixel sample offsets used by the supersampled fillers, relative to
/// the pixel's integer coordinate.
pub(crate) const SAMPLE_OFFSETS: [Vec2; 4] = [
    Vec2::new(-0.25, -0.25),
    Vec2::new(0.25, -0.25),
    Vec2::new(-0.25, 0.25),
    Vec2::new(0.25, 0.25),
];

/// Coverage fraction for a number of samples found inside.
#[inline]
pub(crate) fn coverage(samples_inside: usize) -> f32 {
    samples_inside as f32 / SAMPLE_OFFSETS.len() as f32
}

/// Inclusive pixel bounds of a triangle, intersected with the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BoundingBox {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Tight bounds over the points clipped to the canvas, or None when
    /// they do not overlap it.
    pub fn clipped(points: &[Point2; 3], canvas: &Canvas) -> Option<Self> {
        let [p, q, r] = points;
        let min_x = p.x.min(q.x).min(r.x).max(0);
        let max_x = p.x.max(q.x).max(r.x).min(canvas.width() as i32 - 1);
        let min_y = p.y.min(q.y).min(r.y).max(0);
        let max_y = p.y.max(q.y).max(r.y).min(canvas.height() as i32 - 1);

        (min_x <= max_x && min_y <= max_y).then_some(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }
}

/// The available fill strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    /// Slope-based edge walking down from the highest vertex.
    SlopeWalk,
    /// Sorted top-to-bottom trapezoid decomposition.
    #[default]
    SortedScanline,
    /// Bounding box scan with a barycentric inside test.
    Barycentric,
    /// Barycentric test at 4 samples per pixel, blended by coverage.
    BarycentricSupersampled,
    /// Incremental edge functions with the top-left fill rule.
    EdgeFunction,
    /// Edge functions at 4 samples per pixel, blended by coverage.
    EdgeFunctionSupersampled,
}

impl FillMode {
    pub const ALL: [FillMode; 6] = [
        FillMode::SlopeWalk,
        FillMode::SortedScanline,
        FillMode::Barycentric,
        FillMode::BarycentricSupersampled,
        FillMode::EdgeFunction,
        FillMode::EdgeFunctionSupersampled,
    ];

    /// Short name used by [`fmt::Display`] and [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            FillMode::SlopeWalk => "slope-walk",
            FillMode::SortedScanline => "sorted",
            FillMode::Barycentric => "barycentric",
            FillMode::BarycentricSupersampled => "barycentric-ss",
            FillMode::EdgeFunction => "edge",
            FillMode::EdgeFunctionSupersampled => "edge-ss",
        }
    }

    /// Whether the mode writes partial coverage through the color blender.
    pub fn is_supersampled(self) -> bool {
        matches!(
            self,
            FillMode::BarycentricSupersampled | FillMode::EdgeFunctionSupersampled
        )
    }
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FillMode {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FillMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RasterError::UnknownFillMode(s.to_string()))
    }
}

impl Rasterizer for FillMode {
    #[inline]
    fn fill_triangle(&self, triangle: &Triangle, canvas: &mut Canvas) {
        match self {
            FillMode::SlopeWalk => SlopeWalkRasterizer.fill_triangle(triangle, canvas),
            FillMode::SortedScanline => SortedScanlineRasterizer.fill_triangle(triangle, canvas),
            FillMode::Barycentric => BarycentricRasterizer.fill_triangle(triangle, canvas),
            FillMode::BarycentricSupersampled => {
                SupersampledBarycentricRasterizer.fill_triangle(triangle, canvas)
            }
            FillMode::EdgeFunction => EdgeFunctionRasterizer.fill_triangle(triangle, canvas),
            FillMode::EdgeFunctionSupersampled => {
                SupersampledEdgeFunctionRasterizer.fill_triangle(triangle, canvas)
            }
        }
    }
}

impl Canvas {
    /// Fills `p, q, r` with `color` using the given strategy.
    pub fn fill_triangle(&mut self, mode: FillMode, p: Point2, q: Point2, r: Point2, color: Color) {
        mode.fill_triangle(&Triangle::new(p, q, r, color), self);
    }

    /// Fills a depth-carrying triangle with z-buffer compositing.
    pub fn fill_triangle_depth(&mut self, p: Point3, q: Point3, r: Point3, color: Color) {
        EdgeFunctionRasterizer.fill_triangle_depth(&Triangle3::new(p, q, r, color), self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, CYAN, MAGENTA, TRANSPARENT};

    fn fixture() -> Triangle {
        // Counter-clockwise in y-up space.
        Triangle::new(
            Point2::new(4, 3),
            Point2::new(28, 6),
            Point2::new(12, 27),
            MAGENTA,
        )
    }

    #[test]
    fn mode_names_round_trip() {
        for mode in FillMode::ALL {
            assert_eq!(mode.to_string().parse::<FillMode>().unwrap(), mode);
        }
        assert_eq!("EDGE-SS".parse::<FillMode>().unwrap(), FillMode::EdgeFunctionSupersampled);
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let err = "triangle7".parse::<FillMode>().unwrap_err();
        assert!(matches!(err, RasterError::UnknownFillMode(ref s) if s == "triangle7"));
    }

    #[test]
    fn every_mode_fills_the_interior_and_nothing_far_away() {
        for mode in FillMode::ALL {
            // Transparent background, so full coverage takes the triangle color as-is.
            let mut canvas = Canvas::new(32, 32).unwrap();
            mode.fill_triangle(&fixture(), &mut canvas);

            assert_eq!(canvas.get_pixel(14, 12), Some(MAGENTA), "{mode}");
            assert_eq!(canvas.get_pixel(30, 30), Some(TRANSPARENT), "{mode}");
            assert_eq!(canvas.get_pixel(1, 1), Some(TRANSPARENT), "{mode}");
        }
    }

    #[test]
    fn supersampled_modes_blend_over_opaque_background() {
        for mode in FillMode::ALL.into_iter().filter(|m| m.is_supersampled()) {
            let mut canvas = Canvas::new(32, 32).unwrap();
            canvas.clear(BLACK);
            mode.fill_triangle(&fixture(), &mut canvas);
            // Existing alpha 1 and coverage 1 weigh equally.
            assert_eq!(canvas.get_pixel(14, 12), Some(Color::rgba(128, 0, 128, 255)), "{mode}");
            assert_eq!(canvas.get_pixel(30, 30), Some(BLACK), "{mode}");
        }
    }

    #[test]
    fn triangles_off_canvas_draw_nothing() {
        let tri = Triangle::new(
            Point2::new(-40, -40),
            Point2::new(-10, -40),
            Point2::new(-20, -5),
            CYAN,
        );
        for mode in FillMode::ALL {
            let mut canvas = Canvas::new(16, 16).unwrap();
            mode.fill_triangle(&tri, &mut canvas);
            assert!(canvas.pixels().iter().all(|&c| c == TRANSPARENT), "{mode}");
        }
    }

    #[test]
    fn partially_visible_triangles_are_clipped() {
        let tri = Triangle::new(
            Point2::new(-20, -20),
            Point2::new(40, -10),
            Point2::new(8, 50),
            CYAN,
        );
        for mode in FillMode::ALL {
            let mut canvas = Canvas::new(16, 16).unwrap();
            mode.fill_triangle(&tri, &mut canvas);
            let c = canvas.get_pixel(8, 8).unwrap();
            assert_eq!((c.r, c.g, c.b), (0, 255, 255), "{mode}");
        }
    }

    #[test]
    fn extreme_coordinates_fill_the_visible_part() {
        const FAR: i32 = 2_000_000_000;
        // A wide sliver along y = 0 and a tall one along x = 0, both
        // counter-clockwise, with (5, 5) inside and `outside` beyond them.
        let cases = [
            ([(-FAR, 0), (FAR, 0), (0, 10)], (8, 15)),
            ([(0, FAR), (0, -FAR), (10, 0)], (14, 5)),
        ];
        for (points, outside) in cases {
            let [p, q, r] = points.map(Point2::from);
            let tri = Triangle::new(p, q, r, CYAN);
            for mode in FillMode::ALL {
                let mut canvas = Canvas::new(16, 16).unwrap();
                mode.fill_triangle(&tri, &mut canvas);
                let c = canvas.get_pixel(5, 5).unwrap();
                assert_eq!((c.r, c.g, c.b, c.a), (0, 255, 255, 255), "{mode}");
                assert_eq!(canvas.get_pixel(outside.0, outside.1), Some(TRANSPARENT), "{mode}");
            }

            let mut canvas = Canvas::new(16, 16).unwrap();
            let [p, q, r] = points.map(|(x, y)| Point3::new(x, y, 50));
            canvas.fill_triangle_depth(p, q, r, MAGENTA);
            assert_eq!(canvas.get_pixel(5, 5), Some(MAGENTA));
            assert_eq!(canvas.depth_at(5, 5), Some(50));
        }
    }

    #[test]
    fn drawing_is_deterministic() {
        let triangles = [
            fixture(),
            Triangle::new(Point2::new(0, 0), Point2::new(31, 10), Point2::new(5, 31), CYAN),
        ];
        for mode in FillMode::ALL {
            let render = || {
                let mut canvas = Canvas::new(32, 32).unwrap();
                for tri in &triangles {
                    mode.fill_triangle(tri, &mut canvas);
                }
                canvas.as_bytes().to_vec()
            };
            assert_eq!(render(), render(), "{mode}");
        }
    }

    #[test]
    fn canvas_helpers_dispatch() {
        let mut canvas = Canvas::new(32, 32).unwrap();
        let [p, q, r] = fixture().points;
        canvas.fill_triangle(FillMode::EdgeFunction, p, q, r, CYAN);
        assert_eq!(canvas.get_pixel(14, 12), Some(CYAN));

        canvas.clear_depth();
        canvas.fill_triangle_depth(
            Point3::new(p.x, p.y, 10),
            Point3::new(q.x, q.y, 10),
            Point3::new(r.x, r.y, 10),
            MAGENTA,
        );
        assert_eq!(canvas.get_pixel(14, 12), Some(MAGENTA));
        assert_eq!(canvas.depth_at(14, 12), Some(10));
    }

    #[test]
    fn bounding_box_is_clipped_to_canvas() {
        let canvas = Canvas::new(10, 8).unwrap();
        let bb = BoundingBox::clipped(
            &[Point2::new(-5, 2), Point2::new(4, 20), Point2::new(30, 3)],
            &canvas,
        )
        .unwrap();
        assert_eq!(bb, BoundingBox { min_x: 0, max_x: 9, min_y: 2, max_y: 7 });
        assert!(BoundingBox::clipped(
            &[Point2::new(11, 0), Point2::new(12, 3), Point2::new(15, 1)],
            &canvas
        )
        .is_none());
    }
}
