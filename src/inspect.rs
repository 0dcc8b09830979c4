//! # Capacity Inspection
//!
//! Summarises how much payload an image can carry at a given threshold.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StegError};
use crate::framing::max_message_len;
use crate::pixel::PAYLOAD_SLOTS;
use crate::raster::RasterStore;
use crate::stream::{PayloadStream, StreamOptions};

/// Payload capacity of one image at one alpha threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityReport {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u16,
    pub alpha_threshold: u8,
    pub carrier_pixels: u64,
    /// Raw stream capacity in bytes.
    pub capacity_bytes: u64,
    /// Largest message `embed_message` accepts.
    pub max_message_bytes: u64,
}

/// Build a [`CapacityReport`]. An image with no carrier pixels reports zero
/// capacity rather than failing; unsupported depths still fail.
pub fn inspect<S: RasterStore + ?Sized>(store: &mut S, options: StreamOptions) -> Result<CapacityReport> {
    let (width, height) = store.dimensions();
    let bits_per_pixel = store.bits_per_pixel();

    let capacity_bytes = match PayloadStream::open(store, options) {
        Ok(mut stream) => stream.length()?,
        Err(StegError::NoCarrierCapacity { .. }) => 0,
        Err(e) => return Err(e),
    };

    Ok(CapacityReport {
        width,
        height,
        bits_per_pixel,
        alpha_threshold: options.alpha_threshold,
        carrier_pixels: capacity_bytes / PAYLOAD_SLOTS as u64,
        capacity_bytes,
        max_message_bytes: max_message_len(capacity_bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Color;
    use crate::raster::{Bitmap, PixelFormat};

    #[test]
    fn test_report_counts_carriers() {
        let colors = [
            Color::rgba(0, 0, 0, 0),
            Color::rgba(0, 0, 0, 40),
            Color::rgba(0, 0, 0, 255),
            Color::rgba(0, 0, 0, 0),
        ];
        let mut bmp = Bitmap::from_colors(2, 2, &colors).unwrap();

        let report = inspect(&mut bmp, StreamOptions::default()).unwrap();
        assert_eq!(report.carrier_pixels, 2);
        assert_eq!(report.capacity_bytes, 6);
        assert_eq!(report.max_message_bytes, 2);

        let options = StreamOptions {
            alpha_threshold: 40,
            ..StreamOptions::default()
        };
        assert_eq!(inspect(&mut bmp, options).unwrap().carrier_pixels, 3);
    }

    #[test]
    fn test_opaque_image_reports_zero() {
        let mut bmp = Bitmap::from_colors(1, 1, &[Color::rgba(1, 1, 1, 255)]).unwrap();
        let report = inspect(&mut bmp, StreamOptions::default()).unwrap();
        assert_eq!(report.capacity_bytes, 0);
        assert_eq!(report.max_message_bytes, 0);
    }

    #[test]
    fn test_wrong_depth_still_fails() {
        let mut bmp = Bitmap::new(1, 1, PixelFormat::Gray8);
        assert!(inspect(&mut bmp, StreamOptions::default()).is_err());
    }
}
