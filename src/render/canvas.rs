//! Owning pixel buffer with an optional 8-bit depth buffer.
//!
//! The canvas is addressed in logical coordinates with the origin at the
//! bottom-left corner and y pointing up. Storage is row-major with row 0 at
//! the top of the image, so logical row `y` lives in storage row
//! `height - 1 - y`. Every read and write goes through [`flip_row`] so that
//! mapping exists in exactly one place.

use std::path::Path;

use image::RgbaImage;
use rayon::prelude::*;

use crate::colors::Color;
use crate::error::RasterError;

/// Maps a logical row to its storage row. The mapping is its own inverse,
/// so it also turns storage rows back into logical rows.
#[inline]
fn flip_row(height: u32, y: i32) -> i32 {
    height as i32 - 1 - y
}

/// A fixed-size RGBA canvas.
///
/// # Depth Buffer
///
/// Depth cells hold one byte per pixel. 0 means nothing has been drawn yet;
/// larger values are nearer to the viewer. The depth buffer is created by
/// [`Canvas::with_depth`], or attached on first use by [`Canvas::clear_depth`]
/// or a depth-tested write.
#[derive(Clone, Debug)]
pub struct Canvas {
    color_buffer: Vec<Color>,
    depth_buffer: Option<Vec<u8>>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Creates a canvas filled with transparent black and no depth buffer.
    ///
    /// # Errors
    /// [`RasterError::InvalidDimensions`] if either dimension is zero or the
    /// pixel count does not fit the address space.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let size = Self::pixel_count(width, height)?;
        log::debug!("Allocated {}x{} canvas", width, height);
        Ok(Self {
            color_buffer: vec![Color::default(); size],
            depth_buffer: None,
            width,
            height,
        })
    }

    /// Creates a canvas with a depth buffer cleared to 0.
    pub fn with_depth(width: u32, height: u32) -> Result<Self, RasterError> {
        let mut canvas = Self::new(width, height)?;
        canvas.depth_buffer = Some(vec![0; canvas.color_buffer.len()]);
        Ok(canvas)
    }

    fn pixel_count(width: u32, height: u32) -> Result<usize, RasterError> {
        // Rows must stay addressable as i32 logical coordinates.
        let fits = width > 0 && height > 0 && width <= i32::MAX as u32 && height <= i32::MAX as u32;
        let size = (width as usize).checked_mul(height as usize);
        match size {
            Some(size) if fits => Ok(size),
            _ => Err(RasterError::InvalidDimensions { width, height }),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Storage index of logical pixel (x, y), or None if it is off the canvas.
    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        let row = flip_row(self.height, y) as usize;
        Some(row * self.width as usize + x as usize)
    }

    /// Fills every color cell with `color`.
    pub fn clear(&mut self, color: Color) {
        self.color_buffer.fill(color);
    }

    /// Resets every depth cell to 0, attaching a depth buffer if there is none.
    pub fn clear_depth(&mut self) {
        match &mut self.depth_buffer {
            Some(depth) => depth.fill(0),
            None => {
                log::debug!("Attaching depth buffer to {}x{} canvas", self.width, self.height);
                self.depth_buffer = Some(vec![0; self.color_buffer.len()]);
            }
        }
    }

    pub fn has_depth(&self) -> bool {
        self.depth_buffer.is_some()
    }

    /// Writes one pixel. Off-canvas coordinates are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.color_buffer[idx] = color;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|idx| self.color_buffer[idx])
    }

    /// Get the stored depth at (x, y), or None if out of bounds or no depth
    /// buffer is attached.
    #[inline]
    pub fn depth_at(&self, x: i32, y: i32) -> Option<u8> {
        let idx = self.index(x, y)?;
        self.depth_buffer.as_ref().map(|depth| depth[idx])
    }

    /// Composites `color` over the existing pixel with fractional `coverage`.
    ///
    /// Nothing is written when the blend has zero total weight.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if let Some(idx) = self.index(x, y) {
            if let Some(blended) = Color::with_coverage(self.color_buffer[idx], color, coverage) {
                self.color_buffer[idx] = blended;
            }
        }
    }

    /// Set a pixel at (x, y) with depth testing.
    ///
    /// The pixel is written only if `depth` is greater than or equal to the
    /// stored depth, so ties go to the later write. Color and depth are
    /// updated together. Returns whether the write happened.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: u8, color: Color) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        if self.depth_buffer.is_none() {
            self.clear_depth();
        }
        let Some(depth_buffer) = self.depth_buffer.as_mut() else {
            return false;
        };
        if depth >= depth_buffer[idx] {
            depth_buffer[idx] = depth;
            self.color_buffer[idx] = color;
            true
        } else {
            false
        }
    }

    /// Fills the horizontal span between `x1` and `x2` (inclusive, any order)
    /// on logical row `y`, clipped to the canvas.
    #[inline]
    pub fn fill_scanline(&mut self, y: i32, x1: i32, x2: i32, color: Color) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let x_start = x1.min(x2).max(0);
        let x_end = x1.max(x2).min(self.width as i32 - 1);
        if x_start > x_end {
            return;
        }
        if let (Some(start), Some(end)) = (self.index(x_start, y), self.index(x_end, y)) {
            self.color_buffer[start..=end].fill(color);
        }
    }

    /// Parallel iterator over the logical rows `min_y..=max_y`, yielding each
    /// row's logical y and its pixels (left to right).
    pub(crate) fn par_rows_mut(
        &mut self,
        min_y: i32,
        max_y: i32,
    ) -> impl ParallelIterator<Item = (i32, &mut [Color])> + '_ {
        let height = self.height;
        self.color_buffer
            .par_chunks_mut(self.width as usize)
            .enumerate()
            .filter_map(move |(row, pixels)| {
                let y = flip_row(height, row as i32);
                (min_y..=max_y).contains(&y).then_some((y, pixels))
            })
    }

    /// The color buffer, row-major with row 0 at the top of the image.
    pub fn pixels(&self) -> &[Color] {
        &self.color_buffer
    }

    /// The depth buffer in the same layout as [`Canvas::pixels`], if attached.
    pub fn depth_buffer(&self) -> Option<&[u8]> {
        self.depth_buffer.as_deref()
    }

    /// Returns the frame as RGBA8 bytes, row 0 at the top.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.color_buffer)
    }

    /// Copies the frame into an [`RgbaImage`] for export.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let color = self.color_buffer[y as usize * self.width as usize + x as usize];
            image::Rgba(color.to_array())
        })
    }

    /// Writes the frame to `path` as a PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RasterError> {
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}
