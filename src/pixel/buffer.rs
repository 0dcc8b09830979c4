//! # Pixel Buffer
//!
//! A [`PixelBuffer`] snapshots the raw bytes of a 32bpp [`RasterStore`], keeps the
//! store mutably borrowed while it is alive, and copies the snapshot back exactly
//! once: on [`PixelBuffer::commit`], or when the buffer goes out of scope without
//! having been committed (early returns and `?` paths included).

use log::{debug, warn};

use crate::error::{Result, StegError};
use crate::pixel::Color;
use crate::raster::RasterStore;

/// The only pixel depth a payload can be packed into.
pub const SUPPORTED_DEPTH: u16 = 32;

const BYTES_PER_PIXEL: usize = 4;

/// Owned BGRA copy of a 32bpp store's pixels, written back on commit or drop.
pub struct PixelBuffer<'a, S: RasterStore + ?Sized> {
    /// `None` once the snapshot has been committed.
    store: Option<&'a mut S>,
    data: Vec<u8>,
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a, S: RasterStore + ?Sized> PixelBuffer<'a, S> {
    /// Snapshot `store`, which must be `expected_depth` bits per pixel.
    ///
    /// Fails with [`StegError::UnsupportedFormat`] unless both the store and
    /// `expected_depth` are 32bpp. Nothing is read from the store in that case.
    pub fn open(store: &'a mut S, expected_depth: u16) -> Result<Self> {
        let depth = store.bits_per_pixel();
        if depth != SUPPORTED_DEPTH || expected_depth != SUPPORTED_DEPTH {
            let bits_per_pixel = if depth != SUPPORTED_DEPTH {
                depth
            } else {
                expected_depth
            };
            return Err(StegError::UnsupportedFormat { bits_per_pixel });
        }

        let (width, height) = store.dimensions();
        let stride = store.stride();
        let row_bytes = width as usize * BYTES_PER_PIXEL;
        let actual = store.pixels().len();
        if stride < row_bytes {
            return Err(StegError::InvalidLayout {
                expected: row_bytes * height as usize,
                actual,
            });
        }
        let expected = stride * height as usize;
        if actual != expected {
            return Err(StegError::InvalidLayout { expected, actual });
        }

        let data = store.pixels().to_vec();
        debug!("Opened {}x{} pixel buffer ({} bytes)", width, height, data.len());

        Ok(Self {
            store: Some(store),
            data,
            width,
            height,
            stride,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Color> {
        let i = self.offset(x, y)?;
        let px = &self.data[i..i + BYTES_PER_PIXEL];
        Ok(Color::rgba(px[2], px[1], px[0], px[3]))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> Result<()> {
        let i = self.offset(x, y)?;
        self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&[color.b, color.g, color.r, color.a]);
        Ok(())
    }

    /// Copy the snapshot back into the store and release it.
    pub fn commit(mut self) {
        self.flush();
    }

    pub fn is_committed(&self) -> bool {
        self.store.is_none()
    }

    fn offset(&self, x: u32, y: u32) -> Result<usize> {
        let i = y as usize * self.stride + x as usize * BYTES_PER_PIXEL;
        if x >= self.width || y >= self.height || i + BYTES_PER_PIXEL > self.data.len() {
            return Err(StegError::OutOfBounds { x, y });
        }
        Ok(i)
    }

    fn flush(&mut self) {
        let Some(store) = self.store.take() else {
            return;
        };
        let target = store.pixels_mut();
        if target.len() == self.data.len() {
            target.copy_from_slice(&self.data);
            debug!("Committed {} bytes back to the image", self.data.len());
        } else {
            warn!(
                "Image store resized while locked ({} -> {} bytes), changes discarded",
                self.data.len(),
                target.len()
            );
        }
    }
}

impl<S: RasterStore + ?Sized> Drop for PixelBuffer<'_, S> {
    fn drop(&mut self) {
        self.flush();
    }
}
