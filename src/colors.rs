//! RGBA colors and alpha-weighted compositing.
//!
//! Colors are stored as four 8-bit channels in memory order `r, g, b, a`,
//! which is also the byte layout of the canvas read-back buffer.

use bytemuck::{Pod, Zeroable};

/// An 8-bit-per-channel RGBA color.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const GREEN: Color = Color::rgb(0, 255, 0);
pub const RED: Color = Color::rgb(255, 0, 0);
pub const BLUE: Color = Color::rgb(64, 128, 255);
pub const PURPLE: Color = Color::rgb(128, 128, 255);
pub const ORANGE: Color = Color::rgb(0xff, 0x5c, 0);
pub const MAGENTA: Color = Color::rgb(255, 0, 255);
pub const CYAN: Color = Color::rgb(0, 255, 255);
pub const YELLOW: Color = Color::rgb(255, 200, 0);

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Builds a color from float channels, rounding and clamping each into [0, 255].
    pub fn from_f32_clamped(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::rgba(clamp_channel(r), clamp_channel(g), clamp_channel(b), clamp_channel(a))
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Alpha-weighted blend of two colors.
    ///
    /// Each output channel is the weighted average `(c0 * w0 + c1 * w1) / (w0 + w1)`,
    /// rounded to the nearest integer. The output alpha is `(w0 + w1) * 255`,
    /// clamped to [0, 255].
    ///
    /// Returns `None` when the total weight is not positive, since the
    /// average is undefined there.
    pub fn blend(c0: Color, w0: f32, c1: Color, w1: f32) -> Option<Color> {
        let total = w0 + w1;
        if total.is_nan() || total <= 0.0 {
            return None;
        }

        let channel = |a: u8, b: u8| (a as f32 * w0 + b as f32 * w1) / total;
        Some(Color::from_f32_clamped(
            channel(c0.r, c1.r),
            channel(c0.g, c1.g),
            channel(c0.b, c1.b),
            total * 255.0,
        ))
    }

    /// Composites `src` over `dst` for a pixel with fractional `coverage`.
    ///
    /// The existing pixel is weighted by its own alpha, the incoming color by
    /// the coverage fraction. `None` means there is nothing to write.
    #[inline]
    pub fn with_coverage(dst: Color, src: Color, coverage: f32) -> Option<Color> {
        if coverage <= 0.0 {
            return None;
        }
        Color::blend(dst, dst.a as f32 / 255.0, src, coverage)
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::rgba(r, g, b, a)
    }
}

impl From<Color> for [u8; 4] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

#[inline]
fn clamp_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
