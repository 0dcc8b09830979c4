//! # Pixels
//!
//! - [`word`]: [`Color`] and the big-endian [`PixelWord`] packing
//! - [`buffer`]: the locked, commit-on-release [`PixelBuffer`]

pub mod buffer;
pub mod word;

pub use buffer::{PixelBuffer, SUPPORTED_DEPTH};
pub use word::{Color, PixelWord, MARKER_ALPHA, PAYLOAD_SLOTS};
