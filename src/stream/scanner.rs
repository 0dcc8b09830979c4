//! # Carrier Scanner
//!
//! Finds carrier pixels (alpha at or below the threshold) in row-major order:
//! x increases first, then y. Carriers are located on demand. The only state
//! kept between steps is the [`Cursor`], so a scan can resume from any
//! position and produces the same sequence every time.

use log::trace;

use crate::error::{Result, StegError};
use crate::pixel::{Color, PixelBuffer, PixelWord, PAYLOAD_SLOTS};
use crate::raster::RasterStore;

/// Position of a payload stream inside the carrier sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Coordinate of the current carrier pixel.
    pub x: u32,
    pub y: u32,
    /// Next payload slot inside the current carrier's word, `0..PAYLOAD_SLOTS`.
    pub slot: usize,
    /// No carrier remains; terminal.
    pub exhausted: bool,
}

impl Cursor {
    /// Move to the next slot. Returns `true` when the current carrier is used up.
    pub fn step_slot(&mut self) -> bool {
        self.slot = (self.slot + 1) % PAYLOAD_SLOTS;
        self.slot == 0
    }
}

/// Finds carrier pixels (alpha at or below `threshold`) in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarrierScanner {
    threshold: u8,
}

impl CarrierScanner {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn is_carrier(&self, color: Color) -> bool {
        color.a <= self.threshold
    }

    /// Cursor on the first carrier of the image, together with its word.
    pub fn reset<S: RasterStore + ?Sized>(
        &self,
        buffer: &PixelBuffer<'_, S>,
    ) -> Result<(Cursor, PixelWord)> {
        let (x, y, word) = self
            .search(buffer, 0, 0)?
            .ok_or(StegError::NoCarrierCapacity {
                threshold: self.threshold,
            })?;
        let cursor = Cursor {
            x,
            y,
            slot: 0,
            exhausted: false,
        };
        Ok((cursor, word))
    }

    /// Move `cursor` to the carrier after its current one.
    ///
    /// Returns `None` and marks the cursor exhausted when there is no further
    /// carrier. That is the normal end of the sequence, not an error.
    pub fn advance<S: RasterStore + ?Sized>(
        &self,
        buffer: &PixelBuffer<'_, S>,
        cursor: &mut Cursor,
    ) -> Result<Option<PixelWord>> {
        if cursor.exhausted {
            return Ok(None);
        }
        match self.search(buffer, cursor.x + 1, cursor.y)? {
            Some((x, y, word)) => {
                trace!("Carrier ({}, {}) -> ({}, {})", cursor.x, cursor.y, x, y);
                cursor.x = x;
                cursor.y = y;
                cursor.slot = 0;
                Ok(Some(word))
            }
            None => {
                cursor.exhausted = true;
                Ok(None)
            }
        }
    }

    /// Number of carrier pixels in the whole image.
    pub fn count<S: RasterStore + ?Sized>(&self, buffer: &PixelBuffer<'_, S>) -> Result<u64> {
        let (mut cursor, _) = match self.reset(buffer) {
            Ok(start) => start,
            Err(StegError::NoCarrierCapacity { .. }) => return Ok(0),
            Err(e) => return Err(e),
        };
        let mut carriers = 1;
        while self.advance(buffer, &mut cursor)?.is_some() {
            carriers += 1;
        }
        Ok(carriers)
    }

    /// First carrier at or after `(x, y)` in row-major order.
    fn search<S: RasterStore + ?Sized>(
        &self,
        buffer: &PixelBuffer<'_, S>,
        mut x: u32,
        mut y: u32,
    ) -> Result<Option<(u32, u32, PixelWord)>> {
        let (width, height) = buffer.dimensions();
        while y < height {
            while x < width {
                let color = buffer.get_pixel(x, y)?;
                if self.is_carrier(color) {
                    return Ok(Some((x, y, PixelWord::from(color))));
                }
                x += 1;
            }
            x = 0;
            y += 1;
        }
        Ok(None)
    }
}
