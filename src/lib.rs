//! A CPU triangle rasterizer.
//!
//! This crate fills and outlines triangles directly into an in-memory RGBA
//! canvas without a GPU pipeline. It provides six triangle fill strategies,
//! a Bresenham line drawer and an 8-bit z-buffered filler.
//!
//! Coordinates are logical: the origin is the bottom-left pixel and y points
//! up. Read-back buffers are row-major with row 0 at the top of the image.
//!
//! # Quick Start
//!
//! ```
//! use trifill::prelude::*;
//!
//! let mut canvas = Canvas::new(64, 64)?;
//! canvas.clear(colors::TRANSPARENT);
//! canvas.fill_triangle(
//!     FillMode::EdgeFunction,
//!     Point2::new(7, 3),
//!     Point2::new(62, 53),
//!     Point2::new(12, 37),
//!     colors::CYAN,
//! );
//! canvas.draw_line(7, 3, 12, 37, colors::PURPLE);
//! assert_eq!(canvas.get_pixel(20, 20), Some(colors::CYAN));
//! # Ok::<(), trifill::RasterError>(())
//! ```

pub mod colors;
pub mod error;
pub mod math;
pub mod render;

// Re-export commonly needed types at crate root for convenience
pub use colors::Color;
pub use error::RasterError;
pub use math::{Point2, Point3, Vec2};
pub use render::{BresenhamLine, Canvas, FillMode, Rasterizer, Triangle, Triangle3};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use trifill::prelude::*;
/// ```
pub mod prelude {
    // Colors
    pub use crate::colors::{self, Color};

    // Errors
    pub use crate::error::RasterError;

    // Math
    pub use crate::math::{Point2, Point3, Vec2};

    // Rendering
    pub use crate::render::{BresenhamLine, Canvas, FillMode, Rasterizer, Triangle, Triangle3};
}

/// Module exposing the individual rasterizers for benchmarking.
pub mod bench {
    pub use crate::render::rasterizer::signed_area;
    pub use crate::render::{
        BarycentricRasterizer, Canvas, EdgeFunctionRasterizer, FillMode, Rasterizer,
        SlopeWalkRasterizer, SortedScanlineRasterizer, SupersampledBarycentricRasterizer,
        SupersampledEdgeFunctionRasterizer, Triangle, Triangle3,
    };
}
