//! Scene description for the demo binary.
//!
//! A scene is a TOML file listing the primitives to draw. Every field has a
//! default, and the default scene is a set of test shapes on a 64x64 canvas.
//!
//! ```toml
//! width = 64
//! height = 64
//! background = [0, 0, 0, 0]
//! mode = "edge"
//! points = [[7, 3], [12, 37]]
//!
//! [[triangles]]
//! points = [[7, 3], [50, 20], [62, 53]]
//! color = [255, 0, 255, 255]
//!
//! [[depth_triangles]]
//! points = [[2, 2, 100], [40, 5, 100], [20, 40, 10]]
//! color = [0, 255, 255, 255]
//!
//! [[lines]]
//! from = [7, 3]
//! to = [12, 37]
//! color = [128, 128, 255, 255]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use trifill::colors;
use trifill::{Color, FillMode, Point2, Point3, Triangle, Triangle3};

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse scene file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid scene: {0}")]
    Invalid(#[from] trifill::RasterError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 4],
    /// Fill mode name, see [`FillMode`].
    pub mode: String,
    pub triangles: Vec<TriangleSpec>,
    pub depth_triangles: Vec<DepthTriangleSpec>,
    pub lines: Vec<LineSpec>,
    pub points: Vec<[i32; 2]>,
    pub point_color: [u8; 4],
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriangleSpec {
    pub points: [[i32; 2]; 3],
    pub color: [u8; 4],
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepthTriangleSpec {
    pub points: [(i32, i32, u8); 3],
    pub color: [u8; 4],
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineSpec {
    pub from: [i32; 2],
    pub to: [i32; 2],
    pub color: [u8; 4],
}

impl TriangleSpec {
    fn new(points: [[i32; 2]; 3], color: Color) -> Self {
        Self {
            points,
            color: color.to_array(),
        }
    }

    pub fn to_triangle(&self) -> Triangle {
        let [p, q, r] = self.points.map(|[x, y]| Point2::new(x, y));
        Triangle::new(p, q, r, self.color.into())
    }
}

impl DepthTriangleSpec {
    pub fn to_triangle(&self) -> Triangle3 {
        let [p, q, r] = self.points.map(Point3::from);
        Triangle3::new(p, q, r, self.color.into())
    }
}

impl LineSpec {
    fn new(from: [i32; 2], to: [i32; 2], color: Color) -> Self {
        Self {
            from,
            to,
            color: color.to_array(),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        let a = [7, 3];
        let b = [12, 37];
        let c = [62, 53];
        Self {
            width: 64,
            height: 64,
            background: colors::TRANSPARENT.to_array(),
            mode: FillMode::default().to_string(),
            triangles: vec![
                TriangleSpec::new([a, [50, 20], c], colors::MAGENTA),
                TriangleSpec::new([a, c, b], colors::CYAN),
            ],
            depth_triangles: Vec::new(),
            lines: vec![
                LineSpec::new(a, b, colors::PURPLE),
                LineSpec::new(c, b, colors::GREEN),
                LineSpec::new(c, a, colors::YELLOW),
                LineSpec::new(a, c, colors::RED),
            ],
            points: vec![a, b, c],
            point_color: colors::WHITE.to_array(),
        }
    }
}

impl Scene {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(text)?)
    }

    pub fn fill_mode(&self) -> Result<FillMode, SceneError> {
        Ok(self.mode.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_default_scene() {
        let scene = Scene::from_toml("").unwrap();
        assert_eq!((scene.width, scene.height), (64, 64));
        assert_eq!(scene.triangles.len(), 2);
        assert_eq!(scene.fill_mode().unwrap(), FillMode::SortedScanline);
    }

    #[test]
    fn parses_all_primitive_kinds() {
        let scene = Scene::from_toml(
            r#"
            width = 32
            height = 16
            mode = "barycentric-ss"
            points = [[1, 2]]

            [[triangles]]
            points = [[0, 0], [10, 0], [0, 10]]
            color = [255, 0, 0, 255]

            [[depth_triangles]]
            points = [[0, 0, 5], [10, 0, 5], [0, 10, 200]]
            color = [0, 0, 255, 255]

            [[lines]]
            from = [0, 0]
            to = [31, 15]
            color = [0, 255, 0, 255]
            "#,
        )
        .unwrap();

        assert_eq!((scene.width, scene.height), (32, 16));
        assert_eq!(scene.fill_mode().unwrap(), FillMode::BarycentricSupersampled);
        assert_eq!(scene.triangles[0].to_triangle().color, colors::RED);
        assert_eq!(scene.depth_triangles[0].to_triangle().points[2], Point3::new(0, 10, 200));
        assert_eq!(scene.lines[0].to, [31, 15]);
        assert_eq!(scene.points, vec![[1, 2]]);
    }

    #[test]
    fn rejects_unknown_mode() {
        let scene = Scene::from_toml("mode = \"wireframe\"").unwrap();
        assert!(matches!(scene.fill_mode(), Err(SceneError::Invalid(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(Scene::from_toml("width = "), Err(SceneError::Parse(_))));
    }
}
