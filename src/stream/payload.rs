//! # Payload Stream
//!
//! Forward-only byte stream over the carrier pixels of a 32bpp image.
//!
//! Every carrier pixel holds three payload bytes in its red, green and blue
//! channels, visited in row-major order. The alpha channel is left alone, unless
//! `reveal_carriers` is set, in which case every written pixel becomes fully opaque
//! so the used pixels can be seen in an image viewer.
//!
//! ## Lifecycle
//!
//! 1. [`PayloadStream::open`] snapshots the image and positions on the first carrier
//! 2. bytes are read/written sequentially (also via `std::io::Read`/`Write`)
//! 3. [`PayloadStream::release`], or simply dropping the stream, writes the pixels
//!    back into the image
//!
//! ## Example
//! ```ignore
//! let mut stream = PayloadStream::open(&mut bitmap, StreamOptions::default())?;
//! stream.write_bytes(b"hidden")?;
//! stream.release();
//! ```

use log::debug;
use serde::{Deserialize, Serialize};
use std::io;

use crate::error::{Result, StegError};
use crate::pixel::{Color, PixelBuffer, PixelWord, MARKER_ALPHA, PAYLOAD_SLOTS, SUPPORTED_DEPTH};
use crate::raster::RasterStore;
use crate::stream::scanner::{CarrierScanner, Cursor};

/// How carrier pixels are selected and marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamOptions {
    /// Pixels with alpha at or below this value carry payload. 0 = fully transparent only.
    pub alpha_threshold: u8,
    /// Force the alpha of every written pixel to 255.
    pub reveal_carriers: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            alpha_threshold: 0,
            reveal_carriers: false,
        }
    }
}

/// Byte stream over the RGB channels of an image's carrier pixels.
pub struct PayloadStream<'a, S: RasterStore + ?Sized> {
    buffer: PixelBuffer<'a, S>,
    scanner: CarrierScanner,
    reveal_carriers: bool,
    cursor: Cursor,
    /// Word of the carrier under the cursor, including pending writes.
    word: PixelWord,
    length: Option<u64>,
    position: u64,
}

impl<'a, S: RasterStore + ?Sized> PayloadStream<'a, S> {
    /// Lock `store` and position the stream on its first carrier pixel.
    ///
    /// # Errors
    /// - [`StegError::UnsupportedFormat`] if the image is not 32bpp
    /// - [`StegError::NoCarrierCapacity`] if no pixel passes the alpha threshold
    pub fn open(store: &'a mut S, options: StreamOptions) -> Result<Self> {
        let buffer = PixelBuffer::open(store, SUPPORTED_DEPTH)?;
        let scanner = CarrierScanner::new(options.alpha_threshold);
        let (cursor, word) = scanner.reset(&buffer)?;

        let mut stream = Self {
            buffer,
            scanner,
            reveal_carriers: options.reveal_carriers,
            cursor,
            word,
            length: None,
            position: 0,
        };

        // Revealed pixels stop qualifying as carriers once written, so the count
        // has to be taken before the first write.
        if stream.reveal_carriers {
            stream.length()?;
        }

        debug!(
            "Opened payload stream (threshold {}, first carrier at ({}, {}))",
            options.alpha_threshold, cursor.x, cursor.y
        );
        Ok(stream)
    }

    /// Next payload byte, or `None` once every carrier has been consumed.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.cursor.exhausted {
            return Ok(None);
        }
        let byte = self.word.payload(self.cursor.slot);
        self.step()?;
        Ok(Some(byte))
    }

    /// Store one byte in the next payload slot.
    ///
    /// Fails with [`StegError::CapacityExceeded`] once the carriers are used up.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        if self.cursor.exhausted {
            return Err(StegError::CapacityExceeded);
        }
        self.word.set_payload(self.cursor.slot, byte);

        let mut color = Color::from(self.word);
        if self.reveal_carriers {
            color = color.with_alpha(MARKER_ALPHA);
        }
        self.buffer.set_pixel(self.cursor.x, self.cursor.y, color)?;
        self.step()
    }

    /// Fill `buf` from the stream. A short count means the stream ran out.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
        for (i, slot) in buf.iter_mut().enumerate() {
            match self.read_byte()? {
                Some(byte) => *slot = byte,
                None => return Ok(i),
            }
        }
        Ok(buf.len())
    }

    /// Write all of `buf`. Bytes written before a failure stay written.
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        buf.iter().try_for_each(|&byte| self.write_byte(byte))
    }

    /// The byte [`read_byte`](Self::read_byte) would return next, without consuming it.
    pub fn peek(&self) -> Option<u8> {
        (!self.cursor.exhausted).then(|| self.word.payload(self.cursor.slot))
    }

    pub fn has_remaining(&self) -> bool {
        !self.cursor.exhausted
    }

    /// Total payload capacity in bytes: three per carrier pixel.
    ///
    /// Counted once with a separate scan; the live cursor is not touched.
    pub fn length(&mut self) -> Result<u64> {
        if let Some(length) = self.length {
            return Ok(length);
        }
        let carriers = self.scanner.count(&self.buffer)?;
        let length = carriers * PAYLOAD_SLOTS as u64;
        debug!("Carrier capacity: {} pixels, {} bytes", carriers, length);
        self.length = Some(length);
        Ok(length)
    }

    /// Payload bytes read or written since open or the last [`reset`](Self::reset).
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Go back to the first carrier. Bytes already written stay in the buffer.
    ///
    /// Not available with `reveal_carriers`: written pixels turn opaque and no
    /// longer qualify as carriers, so the written bytes could not be reached again.
    pub fn reset(&mut self) -> Result<()> {
        if self.reveal_carriers {
            return Err(StegError::UnsupportedOperation(
                "cannot reset a stream that reveals carriers",
            ));
        }
        let (cursor, word) = self.scanner.reset(&self.buffer)?;
        self.cursor = cursor;
        self.word = word;
        self.position = 0;
        Ok(())
    }

    /// The capacity is a property of the image and cannot be changed.
    pub fn set_len(&mut self, _len: u64) -> Result<()> {
        Err(StegError::UnsupportedOperation(
            "cannot set the length of a carrier stream",
        ))
    }

    /// Write the pixels back into the image and end the stream.
    pub fn release(self) {
        debug!("Releasing payload stream after {} bytes", self.position);
        self.buffer.commit();
    }

    fn step(&mut self) -> Result<()> {
        self.position += 1;
        if self.cursor.step_slot() {
            match self.scanner.advance(&self.buffer, &mut self.cursor)? {
                Some(word) => self.word = word,
                None => debug!("Carrier pixels exhausted after {} bytes", self.position),
            }
        }
        Ok(())
    }
}

impl<S: RasterStore + ?Sized> io::Read for PayloadStream<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_bytes(buf)?)
    }
}

impl<S: RasterStore + ?Sized> io::Write for PayloadStream<'_, S> {
    /// Writes as much of `buf` as fits. Fails only when nothing could be written.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.cursor.exhausted {
            return Err(StegError::CapacityExceeded.into());
        }
        let mut written = 0;
        for &byte in buf {
            if self.cursor.exhausted {
                break;
            }
            self.write_byte(byte)?;
            written += 1;
        }
        Ok(written)
    }

    /// Pixels are only written back on release.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: RasterStore + ?Sized> io::Seek for PayloadStream<'_, S> {
    fn seek(&mut self, _pos: io::SeekFrom) -> io::Result<u64> {
        Err(StegError::UnsupportedOperation("cannot seek a carrier stream").into())
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{Bitmap, PixelFormat};
    use std::io::{Read, Seek, SeekFrom, Write};

    const OPAQUE: Color = Color::rgba(9, 9, 9, 255);

    /// `carriers` transparent pixels followed by one opaque pixel, in a single row.
    fn strip(carriers: usize) -> Bitmap {
        let mut colors: Vec<Color> = (0..carriers)
            .map(|i| Color::rgba(i as u8, i as u8 + 1, i as u8 + 2, 0))
            .collect();
        colors.push(OPAQUE);
        Bitmap::from_colors(colors.len() as u32, 1, &colors).unwrap()
    }

    #[test]
    fn test_single_carrier_scenario() {
        let mut bmp = Bitmap::from_colors(2, 1, &[Color::rgba(1, 2, 3, 0), OPAQUE]).unwrap();
        {
            let mut stream = PayloadStream::open(&mut bmp, StreamOptions::default()).unwrap();
            assert_eq!(stream.length().unwrap(), 3);
            stream.write_byte(0x41).unwrap();
            stream.release();
        }
        assert_eq!(bmp.color_at(0, 0), Some(Color::rgba(0x41, 2, 3, 0)));
        assert_eq!(bmp.color_at(1, 0), Some(OPAQUE));

        let mut stream = PayloadStream::open(&mut bmp, StreamOptions::default()).unwrap();
        assert_eq!(stream.read_byte().unwrap(), Some(0x41));
        assert_eq!(stream.read_byte().unwrap(), Some(2));
        assert_eq!(stream.read_byte().unwrap(), Some(3));
        assert_eq!(stream.read_byte().unwrap(), None);
    }

    #[test]
    fn test_last_byte_delivered_before_exhaustion() {
        let mut bmp = strip(1);
        let mut stream = PayloadStream::open(&mut bmp, StreamOptions::default()).unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(stream.read_bytes(&mut buf).unwrap(), 2);
        assert!(stream.has_remaining());
        assert_eq!(stream.peek(), Some(2));
        assert_eq!(stream.read_byte().unwrap(), Some(2));
        assert!(!stream.has_remaining());
        assert_eq!(stream.peek(), None);
    }

    #[test]
    fn test_read_returns_short_count() {
        let mut bmp = strip(2);
        let mut stream = PayloadStream::open(&mut bmp, StreamOptions::default()).unwrap();

        let mut buf = [0xFFu8; 10];
        assert_eq!(stream.read_bytes(&mut buf).unwrap(), 6);
        assert_eq!(&buf[..6], &[0, 1, 2, 1, 2, 3]);
        assert_eq!(buf[6], 0xFF);
        assert_eq!(stream.read_bytes(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_write_fails_exactly_at_capacity() {
        let mut bmp = strip(2);
        {
            let mut stream = PayloadStream::open(&mut bmp, StreamOptions::default()).unwrap();
            let capacity = stream.length().unwrap() as usize;
            let payload: Vec<u8> = (100..100 + capacity as u8 + 2).collect();

            for (i, &byte) in payload.iter().enumerate() {
                let result = stream.write_byte(byte);
                if i < capacity {
                    assert!(result.is_ok(), "byte {i} should fit");
                } else {
                    assert!(matches!(result, Err(StegError::CapacityExceeded)));
                }
            }
        }
        assert_eq!(bmp.color_at(0, 0), Some(Color::rgba(100, 101, 102, 0)));
        assert_eq!(bmp.color_at(1, 0), Some(Color::rgba(103, 104, 105, 0)));
        assert_eq!(bmp.color_at(2, 0), Some(OPAQUE));
    }

    #[test]
    fn test_write_bytes_keeps_partial_write() {
        let mut bmp = strip(1);
        {
            let mut stream = PayloadStream::open(&mut bmp, StreamOptions::default()).unwrap();
            assert!(matches!(
                stream.write_bytes(b"wxyz"),
                Err(StegError::CapacityExceeded)
            ));
        }
        assert_eq!(bmp.color_at(0, 0), Some(Color::rgba(b'w', b'x', b'y', 0)));
    }

    #[test]
    fn test_length_does_not_move_cursor() {
        let mut bmp = strip(3);
        let mut stream = PayloadStream::open(&mut bmp, StreamOptions::default()).unwrap();
        stream.write_bytes(&[7, 7, 7, 7]).unwrap();
        let before = stream.cursor();

        assert_eq!(stream.length().unwrap(), 9);
        assert_eq!(stream.cursor(), before);
        assert_eq!(stream.position(), 4);
        assert_eq!(stream.read_byte().unwrap(), Some(2));
    }

    #[test]
    fn test_reveal_marks_written_pixels_and_keeps_length() {
        let mut bmp = strip(2);
        let options = StreamOptions {
            alpha_threshold: 0,
            reveal_carriers: true,
        };
        {
            let mut stream = PayloadStream::open(&mut bmp, options).unwrap();
            stream.write_bytes(&[1, 2, 3, 4]).unwrap();
            assert_eq!(stream.length().unwrap(), 6);
        }
        assert_eq!(bmp.color_at(0, 0).unwrap().a, MARKER_ALPHA);
        assert_eq!(bmp.color_at(1, 0).unwrap().a, MARKER_ALPHA);
    }

    #[test]
    fn test_reveal_overrides_nonzero_alpha() {
        let mut bmp = Bitmap::from_colors(2, 1, &[Color::rgba(1, 2, 3, 40), OPAQUE]).unwrap();
        let options = StreamOptions {
            alpha_threshold: 50,
            reveal_carriers: true,
        };
        {
            let mut stream = PayloadStream::open(&mut bmp, options).unwrap();
            stream.write_byte(0x41).unwrap();
        }
        assert_eq!(bmp.color_at(0, 0), Some(Color::rgba(0x41, 2, 3, MARKER_ALPHA)));
    }

    #[test]
    fn test_reset_in_reveal_mode() {
        let mut bmp = Bitmap::from_colors(3, 1, &[Color::rgba(0, 0, 0, 0); 3]).unwrap();
        let options = StreamOptions {
            alpha_threshold: 0,
            reveal_carriers: true,
        };
        let mut stream = PayloadStream::open(&mut bmp, options).unwrap();
        stream.write_bytes(b"abcd").unwrap();

        assert!(matches!(
            stream.reset(),
            Err(StegError::UnsupportedOperation(_))
        ));
        assert_eq!(stream.position(), 4);
        stream.write_byte(b'e').unwrap();
        stream.release();
        assert_eq!(bmp.color_at(1, 0), Some(Color::rgba(b'd', b'e', 0, MARKER_ALPHA)));
    }

    #[test]
    fn test_reset_rewinds_to_first_carrier() {
        let mut bmp = strip(2);
        let mut stream = PayloadStream::open(&mut bmp, StreamOptions::default()).unwrap();
        stream.write_bytes(b"abcd").unwrap();
        stream.reset().unwrap();

        assert_eq!(stream.position(), 0);
        let mut buf = [0u8; 4];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"abcd");
    }

    #[test]
    fn test_open_rejects_other_depths_and_opaque_images() {
        let mut bmp = Bitmap::new(2, 2, PixelFormat::Bgr24);
        assert!(matches!(
            PayloadStream::open(&mut bmp, StreamOptions::default()),
            Err(StegError::UnsupportedFormat { bits_per_pixel: 24 })
        ));

        let mut bmp = Bitmap::from_colors(2, 1, &[OPAQUE, OPAQUE]).unwrap();
        assert!(matches!(
            PayloadStream::open(&mut bmp, StreamOptions::default()),
            Err(StegError::NoCarrierCapacity { threshold: 0 })
        ));
    }

    #[test]
    fn test_seek_and_set_len_are_unsupported() {
        let mut bmp = strip(1);
        let mut stream = PayloadStream::open(&mut bmp, StreamOptions::default()).unwrap();

        let err = stream.seek(SeekFrom::Start(0)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
        assert!(matches!(
            stream.set_len(10),
            Err(StegError::UnsupportedOperation(_))
        ));

        stream.read_byte().unwrap();
        assert_eq!(stream.stream_position().unwrap(), 1);
    }

    #[test]
    fn test_io_write_reports_short_write_then_fails() {
        let mut bmp = strip(1);
        let mut stream = PayloadStream::open(&mut bmp, StreamOptions::default()).unwrap();

        assert_eq!(stream.write(b"hello").unwrap(), 3);
        let err = stream.write(b"lo").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
        assert!(stream.write_all(b"x").is_err());
    }
}
