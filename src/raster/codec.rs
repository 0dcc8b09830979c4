//! # Image Codec
//!
//! Conversion between files / encoded bytes and [`Bitmap`], using the `image` crate.
//!
//! | `image` color type | bitmap format |
//! |--------------------|---------------|
//! | `Rgba8`            | `Bgra32`      |
//! | `Rgb8`             | `Bgr24`       |
//! | `L8`               | `Gray8`       |
//!
//! Anything else is rejected unless `force_rgba` asks for an RGBA8 conversion first.
//! Only `Bgra32` bitmaps can be encoded again, since that is the only format a
//! payload stream can have modified.

use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use log::debug;
use std::path::Path;

use crate::error::{Result, StegError};
use crate::raster::{Bitmap, PixelFormat};

/// Open an image file and convert it into a [`Bitmap`].
pub fn load_bitmap(path: &Path, force_rgba: bool) -> Result<Bitmap> {
    let img = image::open(path)?;
    let (width, height) = img.dimensions();
    debug!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        width,
        height,
        img.color()
    );
    from_dynamic(img, force_rgba)
}

/// Decode an in-memory encoded image (PNG, BMP, ...) into a [`Bitmap`].
pub fn decode_bitmap(bytes: &[u8], force_rgba: bool) -> Result<Bitmap> {
    let img = image::load_from_memory(bytes)?;
    from_dynamic(img, force_rgba)
}

/// Save a 32bpp bitmap; the file format follows the path's extension.
pub fn save_bitmap(bitmap: &Bitmap, path: &Path) -> Result<()> {
    to_rgba_image(bitmap)?.save(path)?;
    debug!("Saved {}", path.display());
    Ok(())
}

/// Encode a 32bpp bitmap as PNG bytes.
pub fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>> {
    let mut output_bytes = Vec::new();
    to_rgba_image(bitmap)?.write_to(
        &mut std::io::Cursor::new(&mut output_bytes),
        ImageFormat::Png,
    )?;
    Ok(output_bytes)
}

fn from_dynamic(img: DynamicImage, force_rgba: bool) -> Result<Bitmap> {
    let img = if force_rgba {
        DynamicImage::ImageRgba8(img.into_rgba8())
    } else {
        img
    };

    let (width, height) = img.dimensions();
    match img {
        DynamicImage::ImageRgba8(buf) => {
            let mut data = buf.into_raw();
            for px in data.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
            Bitmap::from_raw(width, height, PixelFormat::Bgra32, data)
        }
        DynamicImage::ImageRgb8(buf) => {
            let mut data = buf.into_raw();
            for px in data.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
            Bitmap::from_raw(width, height, PixelFormat::Bgr24, data)
        }
        DynamicImage::ImageLuma8(buf) => {
            Bitmap::from_raw(width, height, PixelFormat::Gray8, buf.into_raw())
        }
        other => Err(StegError::UnsupportedFormat {
            bits_per_pixel: other.color().bits_per_pixel(),
        }),
    }
}

fn to_rgba_image(bitmap: &Bitmap) -> Result<RgbaImage> {
    if bitmap.format() != PixelFormat::Bgra32 {
        return Err(StegError::UnsupportedFormat {
            bits_per_pixel: bitmap.format().bits_per_pixel(),
        });
    }

    let mut data = bitmap.as_bytes().to_vec();
    for px in data.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    let actual = data.len();
    RgbaImage::from_raw(bitmap.width(), bitmap.height(), data).ok_or(StegError::InvalidLayout {
        expected: bitmap.width() as usize * bitmap.height() as usize * 4,
        actual,
    })
}
