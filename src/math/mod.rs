//! Screen-space point and vector types.

pub mod point;
pub mod vec2;

pub use point::{Point2, Point3};
pub use vec2::Vec2;
