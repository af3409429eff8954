use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Canvas dimensions must be positive and addressable, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Unknown fill mode: {0}")]
    UnknownFillMode(String),
    #[error("Failed to export image: {0}")]
    Image(#[from] image::ImageError),
}
