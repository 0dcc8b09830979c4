//! # Raster Storage
//!
//! The backing image a payload stream reads from and commits back into.
//!
//! - [`RasterStore`]: the raw pixel store a stream borrows exclusively
//! - [`Bitmap`]: an owned in-memory raster in native (BGR/BGRA) channel order
//! - [`codec`]: loading and saving bitmaps through the `image` crate

pub mod bitmap;
pub mod codec;

pub use bitmap::{Bitmap, PixelFormat};

/// Raw pixel memory of an image.
///
/// Rows are `stride()` bytes apart and `pixels()` holds exactly
/// `stride() * height` bytes. A 32bpp store lays each pixel out as
/// blue, green, red, alpha.
pub trait RasterStore {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    fn bits_per_pixel(&self) -> u16;

    /// Bytes between the starts of two consecutive rows.
    fn stride(&self) -> usize;

    fn pixels(&self) -> &[u8];

    fn pixels_mut(&mut self) -> &mut [u8];
}
