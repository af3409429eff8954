/// An integer point in canvas-logical space (origin bottom-left, y up).
///
/// No bounds are enforced here; the canvas and fillers clip at their
/// boundaries. Differences between points can exceed `i32`, so the fillers
/// widen coordinates before subtracting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point2 {
    pub x: i32,
    pub y: i32,
}

impl Point2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point2 {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// An integer point with a depth value. Larger `z` is nearer to the viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point3 {
    pub x: i32,
    pub y: i32,
    pub z: u8,
}

impl Point3 {
    pub const fn new(x: i32, y: i32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Drops the depth component.
    #[inline]
    pub fn xy(self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

impl From<(i32, i32, u8)> for Point3 {
    fn from((x, y, z): (i32, i32, u8)) -> Self {
        Self::new(x, y, z)
    }
}
