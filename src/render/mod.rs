//! Canvas, line drawing and triangle fillers.

pub mod canvas;
pub mod line;
pub mod rasterizer;

pub use canvas::Canvas;
pub use line::BresenhamLine;
pub use rasterizer::{
    BarycentricRasterizer, EdgeFunctionRasterizer, FillMode, Rasterizer, SlopeWalkRasterizer,
    SortedScanlineRasterizer, SupersampledBarycentricRasterizer,
    SupersampledEdgeFunctionRasterizer, Triangle, Triangle3,
};
