use crate::error::{Result, StegError};
use crate::pixel::Color;
use crate::raster::RasterStore;

/// Channel layouts a [`Bitmap`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One gray byte per pixel.
    Gray8,
    /// Blue, green, red.
    Bgr24,
    /// Blue, green, red, alpha.
    Bgra32,
}

impl PixelFormat {
    pub const fn bits_per_pixel(self) -> u16 {
        match self {
            PixelFormat::Gray8 => 8,
            PixelFormat::Bgr24 => 24,
            PixelFormat::Bgra32 => 32,
        }
    }

    pub const fn bytes_per_pixel(self) -> usize {
        self.bits_per_pixel() as usize / 8
    }
}

/// Owned raster with tightly packed rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    format: PixelFormat,
    stride: usize,
    data: Vec<u8>,
}

impl Bitmap {
    /// Zero-filled bitmap. For `Bgra32` every pixel is fully transparent black.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let stride = width as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
            stride,
            data: vec![0; stride * height as usize],
        }
    }

    /// Wrap raw native-order bytes. `data` must be exactly `width * bpp * height` long.
    pub fn from_raw(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let stride = width as usize * format.bytes_per_pixel();
        let expected = stride * height as usize;
        if data.len() != expected {
            return Err(StegError::InvalidLayout {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            stride,
            data,
        })
    }

    /// Build a 32bpp bitmap from colors listed in row-major order.
    pub fn from_colors(width: u32, height: u32, colors: &[Color]) -> Result<Self> {
        let data = colors.iter().flat_map(|c| [c.b, c.g, c.r, c.a]).collect();
        Self::from_raw(width, height, PixelFormat::Bgra32, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Read one pixel in any supported format. Gray and BGR pixels report alpha 255.
    pub fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y as usize * self.stride + x as usize * self.format.bytes_per_pixel();
        let px = &self.data[i..i + self.format.bytes_per_pixel()];
        Some(match self.format {
            PixelFormat::Gray8 => Color::rgba(px[0], px[0], px[0], u8::MAX),
            PixelFormat::Bgr24 => Color::rgba(px[2], px[1], px[0], u8::MAX),
            PixelFormat::Bgra32 => Color::rgba(px[2], px[1], px[0], px[3]),
        })
    }

    /// Raw native-order bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl RasterStore for Bitmap {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn bits_per_pixel(&self) -> u16 {
        self.format.bits_per_pixel()
    }

    fn stride(&self) -> usize {
        self.stride
    }

    fn pixels(&self) -> &[u8] {
        &self.data
    }

    fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
