//! # Message Framing
//!
//! A carrier stream has no end marker: reading continues through whatever the
//! unused carrier pixels happen to contain. Messages are therefore framed as
//!
//! ```text
//! [4 bytes length, big-endian][payload bytes]
//! ```
//!
//! The helpers below work on any `std::io` reader/writer. `embed_message` and
//! `extract_message` wrap them around a [`PayloadStream`].

use log::{debug, info};
use std::io::{self, Read, Write};

use crate::error::{Result, StegError};
use crate::raster::RasterStore;
use crate::stream::{PayloadStream, StreamOptions};

/// Size of the length prefix in bytes.
pub const HEADER_LEN: u64 = 4;

/// Write `payload` preceded by its length.
pub fn write_message<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    let length = u32::try_from(payload.len()).map_err(|_| StegError::MessageTooLarge {
        required: payload.len() as u64,
        available: u32::MAX as u64,
    })?;
    writer.write_all(&length.to_be_bytes())?;
    writer.write_all(payload)?;
    Ok(())
}

/// Read one length-prefixed message.
///
/// Fails with [`StegError::TruncatedMessage`] when the reader ends before the
/// declared number of bytes arrived.
pub fn read_message<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut length_bytes = [0u8; HEADER_LEN as usize];
    read_exact_or_truncated(reader, &mut length_bytes, HEADER_LEN)?;
    let length = u32::from_be_bytes(length_bytes) as u64;

    let mut payload = Vec::new();
    let read = reader.take(length).read_to_end(&mut payload)?;
    if (read as u64) < length {
        return Err(StegError::TruncatedMessage { declared: length });
    }
    Ok(payload)
}

/// Largest message that fits into a stream of `capacity` bytes.
pub fn max_message_len(capacity: u64) -> u64 {
    capacity.saturating_sub(HEADER_LEN)
}

/// Hide `payload` in `store`. Returns the number of carrier bytes used.
///
/// The capacity is checked first, so an oversized message leaves the image untouched.
pub fn embed_message<S: RasterStore + ?Sized>(
    store: &mut S,
    options: StreamOptions,
    payload: &[u8],
) -> Result<u64> {
    let mut stream = PayloadStream::open(store, options)?;
    let capacity = stream.length()?;
    let required = HEADER_LEN + payload.len() as u64;
    if required > capacity {
        return Err(StegError::MessageTooLarge {
            required,
            available: capacity,
        });
    }

    write_message(&mut stream, payload)?;
    stream.release();
    info!(
        "Embedded {} bytes ({} of {} carrier bytes used)",
        payload.len(),
        required,
        capacity
    );
    Ok(required)
}

/// Recover a message hidden with [`embed_message`] and the same options.
pub fn extract_message<S: RasterStore + ?Sized>(
    store: &mut S,
    options: StreamOptions,
) -> Result<Vec<u8>> {
    let mut stream = PayloadStream::open(store, options)?;
    let payload = read_message(&mut stream)?;
    debug!("Extracted {} byte message", payload.len());
    stream.release();
    Ok(payload)
}

fn read_exact_or_truncated<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    declared: u64,
) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => StegError::TruncatedMessage { declared },
        _ => StegError::Io(e),
    })
}
