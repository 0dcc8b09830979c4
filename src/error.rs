//! # Error Types
//!
//! Every fallible operation in the library returns [`StegError`]. The binaries
//! wrap it in `anyhow` at the edges.

use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StegError>;

/// Errors raised while opening, scanning, reading or writing a payload stream.
#[derive(Debug, thiserror::Error)]
pub enum StegError {
    /// The image does not have the 32 bits per pixel the payload layout requires.
    #[error("unsupported pixel format: {bits_per_pixel} bits per pixel (only 32bpp images are supported)")]
    UnsupportedFormat { bits_per_pixel: u16 },

    /// No pixel in the image is at or below the alpha threshold.
    #[error("no carrier pixel in the image (no pixel with alpha <= {threshold})")]
    NoCarrierCapacity { threshold: u8 },

    /// A pixel coordinate maps outside the pixel buffer.
    #[error("pixel ({x}, {y}) is outside of the image's bounds")]
    OutOfBounds { x: u32, y: u32 },

    /// A write was attempted after the last carrier pixel was used up.
    #[error("no more carrier pixels to write to")]
    CapacityExceeded,

    /// Seeking and resizing are not possible on a carrier stream.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// Raw pixel data does not match `stride * height`.
    #[error("invalid raster layout: expected {expected} bytes, got {actual}")]
    InvalidLayout { expected: usize, actual: usize },

    /// A framed message does not fit into the image.
    #[error("message too large: need {required} bytes but only {available} are available")]
    MessageTooLarge { required: u64, available: u64 },

    /// A framed message declares more bytes than the stream delivered.
    #[error("truncated message: header declares {declared} bytes, stream ended early")]
    TruncatedMessage { declared: u64 },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("image codec: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o: {0}")]
    Io(io::Error),
}

impl StegError {
    /// The `std::io` kind used when this error crosses a `Read`/`Write`/`Seek` boundary.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            StegError::CapacityExceeded => io::ErrorKind::WriteZero,
            StegError::UnsupportedOperation(_) => io::ErrorKind::Unsupported,
            StegError::TruncatedMessage { .. } => io::ErrorKind::UnexpectedEof,
            StegError::OutOfBounds { .. } | StegError::InvalidLayout { .. } => {
                io::ErrorKind::InvalidData
            }
            StegError::Io(e) => e.kind(),
            _ => io::ErrorKind::Other,
        }
    }
}

/// Unwraps a `StegError` that crossed an `std::io` boundary instead of nesting it.
impl From<io::Error> for StegError {
    fn from(err: io::Error) -> Self {
        if err.get_ref().is_none() {
            return StegError::Io(err);
        }
        let kind = err.kind();
        match err.into_inner().map(|inner| inner.downcast::<StegError>()) {
            Some(Ok(steg)) => *steg,
            Some(Err(other)) => StegError::Io(io::Error::new(kind, other)),
            None => StegError::Io(kind.into()),
        }
    }
}

impl From<StegError> for io::Error {
    fn from(err: StegError) -> Self {
        match err {
            StegError::Io(e) => e,
            other => io::Error::new(other.io_kind(), other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_conversion_keeps_inner_error() {
        let err: io::Error = StegError::CapacityExceeded.into();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
        let inner = err
            .get_ref()
            .and_then(|e| e.downcast_ref::<StegError>())
            .expect("inner StegError");
        assert!(matches!(inner, StegError::CapacityExceeded));
    }

    #[test]
    fn test_io_error_round_trips_unchanged() {
        let original = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: io::Error = StegError::Io(original).into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_wrapped_error_is_unwrapped() {
        let io_err: io::Error = StegError::CapacityExceeded.into();
        assert!(matches!(StegError::from(io_err), StegError::CapacityExceeded));

        let plain = io::Error::new(io::ErrorKind::Other, "disk");
        assert!(matches!(StegError::from(plain), StegError::Io(_)));
    }

    #[test]
    fn test_display_mentions_depth() {
        let msg = StegError::UnsupportedFormat { bits_per_pixel: 24 }.to_string();
        assert!(msg.contains("24 bits per pixel"));
    }
}
